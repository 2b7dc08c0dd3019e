use std::fs;
use std::sync::Arc;

use courier_fetch::mock::MockTransport;
use courier_files::{
    InMemoryResource, LazySource, LocalFileResource, RemoteResource, Resource, SaveOptions,
    StreamOptions,
};
use tempfile::tempdir;

fn entries(dir: &std::path::Path) -> usize { fs::read_dir(dir).unwrap().count() }

#[tokio::test]
async fn test_save_into_directory_uses_filename() {
    let dir = tempdir().unwrap();
    let resource = Resource::from(InMemoryResource::new(b"hello".to_vec(), "hello.txt"));

    let saved = resource.save(dir.path(), &SaveOptions::new()).await.unwrap();

    assert_eq!(saved, dir.path().join("hello.txt"));
    assert_eq!(fs::read(&saved).unwrap(), b"hello");
}

#[tokio::test]
async fn test_save_without_force_keeps_existing_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("existing.txt");
    fs::write(&target, b"original").unwrap();

    let resource = Resource::from(InMemoryResource::new(b"replacement".to_vec(), "x.txt"));
    let err = resource.save(&target, &SaveOptions::new()).await.unwrap_err();

    assert!(matches!(err.fs(), Some(courier_fs::Error::AlreadyExists(_))));
    assert_eq!(fs::read(&target).unwrap(), b"original");
    assert_eq!(entries(dir.path()), 1);
}

#[tokio::test]
async fn test_save_with_force_overwrites() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("existing.txt");
    fs::write(&target, b"original").unwrap();

    let resource = Resource::from(InMemoryResource::new(b"replacement".to_vec(), "x.txt"));
    resource.save(&target, &SaveOptions::new().force(true)).await.unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"replacement");
}

#[tokio::test]
async fn test_save_local_file_copies() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.bin");
    fs::write(&source, vec![5u8; 4096]).unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let resource = Resource::from(LocalFileResource::new(&source).with_filename("renamed.bin"));
    let saved = resource.save(&out, &SaveOptions::new()).await.unwrap();

    assert_eq!(saved, out.join("renamed.bin"));
    assert_eq!(fs::read(saved).unwrap(), vec![5u8; 4096]);

    let err = resource.save(&out, &SaveOptions::new()).await.unwrap_err();
    assert!(matches!(err.fs(), Some(courier_fs::Error::AlreadyExists(_))));
}

#[tokio::test]
async fn test_save_remote_streams_to_disk() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new(200).chunks(["one ", "two ", "three"]));
    let options = SaveOptions::new().stream(StreamOptions::default().transport(transport.clone()));

    let resource = Resource::from(RemoteResource::new("https://example.com/files/words.txt"));
    let saved = resource.save(dir.path(), &options).await.unwrap();

    assert_eq!(saved, dir.path().join("words.txt"));
    assert_eq!(fs::read(saved).unwrap(), b"one two three");
    assert_eq!(transport.sessions_closed(), 1);
    assert_eq!(entries(dir.path()), 1);
}

#[tokio::test]
async fn test_failed_remote_save_leaves_nothing_behind() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new(200).chunks(["a", "b"]).fail_after(1));
    let options = SaveOptions::new().stream(StreamOptions::default().transport(transport.clone()));

    let resource = Resource::from(RemoteResource::new("https://example.com/broken.bin"));
    assert!(resource.save(dir.path(), &options).await.is_err());

    assert_eq!(entries(dir.path()), 0);
    assert_eq!(transport.sessions_closed(), 1);
}

#[tokio::test]
async fn test_save_http_error_creates_nothing() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new(403));
    let options = SaveOptions::new().stream(StreamOptions::default().transport(transport.clone()));

    let resource = Resource::from(RemoteResource::new("https://example.com/secret.bin"));
    let err = resource.save(dir.path(), &options).await.unwrap_err();

    assert_eq!(err.http_kind(), Some(courier_fetch::HttpErrorKind::Forbidden));
    assert_eq!(entries(dir.path()), 0);
}

#[tokio::test]
async fn test_save_lazy_source() {
    let dir = tempdir().unwrap();
    let source = LazySource::from_reader(std::io::Cursor::new(vec![8u8; 150_000]));
    let resource = Resource::from(InMemoryResource::new(source, "big.bin"));

    let saved = resource.save(dir.path(), &SaveOptions::new()).await.unwrap();
    assert_eq!(fs::read(saved).unwrap().len(), 150_000);
}

#[tokio::test]
async fn test_save_url_without_filename_into_directory() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new(200).body("index"));
    let options = SaveOptions::new().stream(StreamOptions::default().transport(transport.clone()));

    let resource = Resource::from(RemoteResource::new("https://example.com/files/"));
    let saved = resource.save(dir.path(), &options).await.unwrap();

    assert_eq!(saved.parent(), Some(dir.path()));
    assert_ne!(saved, dir.path());
    assert_eq!(fs::read(&saved).unwrap(), b"index");
}
