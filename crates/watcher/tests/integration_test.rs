//! Integration tests for the polling watcher
//!
//! These tests use temporary directories and real filesystem operations
//! to validate the watcher's behavior in realistic scenarios. Files are
//! replaced through a rename so a poll never observes a half-written file.

use fswatcher::{Error, Event, Op, Watcher, WatcherConfig};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

const EVENT_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Either half of the watcher output
#[derive(Debug)]
enum Item {
    Event(Event),
    Error(Error),
}

/// Helper to atomically replace a file's content
fn write_file(path: &Path, content: &str) {
    let tmp = path.with_extension("partial");
    std::fs::write(&tmp, content).unwrap();
    std::fs::rename(&tmp, path).unwrap();
}

/// Helper to atomically create or repoint a symlink
#[cfg(unix)]
fn point_symlink(target: impl AsRef<Path>, link: &Path) {
    let mut tmp_name = link.file_name().unwrap().to_os_string();
    tmp_name.push(".relink");
    let tmp = link.with_file_name(tmp_name);
    let _ = std::fs::remove_file(&tmp);
    std::os::unix::fs::symlink(target, &tmp).unwrap();
    std::fs::rename(&tmp, link).unwrap();
}

async fn next_event(watcher: &Watcher) -> Event {
    timeout(EVENT_TIMEOUT, watcher.events().recv_async())
        .await
        .expect("timed out waiting for event")
        .unwrap()
}

async fn next_item(watcher: &Watcher) -> Item {
    let item = async {
        tokio::select! {
            Ok(event) = watcher.events().recv_async() => Item::Event(event),
            Ok(error) = watcher.errors().recv_async() => Item::Error(error),
        }
    };
    timeout(EVENT_TIMEOUT, item)
        .await
        .expect("timed out waiting for event or error")
}

async fn assert_quiet(watcher: &Watcher) {
    if let Ok(Ok(event)) = timeout(QUIET_PERIOD, watcher.events().recv_async()).await {
        panic!("Expected no event, got {event:?}");
    }
}

fn watch<P: AsRef<Path>>(paths: &[P]) -> Watcher {
    Watcher::new(
        paths.iter().map(|p| p.as_ref().to_path_buf()),
        WatcherConfig::testing(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_file_creation_with_content() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("config.yaml");
    let watcher = watch(&[&file]);

    assert_quiet(&watcher).await;
    write_file(&file, "key: value");

    let event = next_event(&watcher).await;
    assert_eq!(event, Event::new(&file, Op::CREATE | Op::WRITE));
    assert_quiet(&watcher).await;

    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_file_creation() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("empty");
    let watcher = watch(&[&file]);

    write_file(&file, "");

    let event = next_event(&watcher).await;
    assert_eq!(event, Event::new(&file, Op::CREATE));

    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_existing_file_reported_on_first_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("token");
    write_file(&file, "secret");

    let watcher = watch(&[&file]);

    let event = next_event(&watcher).await;
    assert_eq!(event, Event::new(&file, Op::CREATE | Op::WRITE));

    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_file_modification_detection() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("tls.key");
    write_file(&file, "v1");
    let watcher = watch(&[&file]);
    assert!(next_event(&watcher).await.has(Op::CREATE));

    write_file(&file, "version two");
    assert_eq!(next_event(&watcher).await, Event::new(&file, Op::WRITE));
    assert_quiet(&watcher).await;

    write_file(&file, "version three, longer");
    assert_eq!(next_event(&watcher).await, Event::new(&file, Op::WRITE));
    assert_quiet(&watcher).await;

    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_file_deletion_and_recreation() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("ca.crt");
    write_file(&file, "cert");
    let watcher = watch(&[&file]);
    assert!(next_event(&watcher).await.has(Op::CREATE));

    std::fs::remove_file(&file).unwrap();
    assert_eq!(next_event(&watcher).await, Event::new(&file, Op::REMOVE));
    assert_quiet(&watcher).await;

    write_file(&file, "new cert");
    assert_eq!(
        next_event(&watcher).await,
        Event::new(&file, Op::CREATE | Op::WRITE)
    );

    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_event_name_is_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let spelled = PathBuf::from(format!("{}/./data", temp_dir.path().display()));
    let watcher = watch(&[&spelled]);

    write_file(&temp_dir.path().join("data"), "x");

    let event = next_event(&watcher).await;
    assert_eq!(event.name.as_os_str(), spelled.as_os_str());

    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_multiple_paths_report_independently() {
    let temp_dir = TempDir::new().unwrap();
    let cert = temp_dir.path().join("tls.crt");
    let key = temp_dir.path().join("tls.key");
    let watcher = watch(&[&cert, &key, &cert]);
    assert_eq!(watcher.tracked_paths().len(), 2);

    write_file(&cert, "cert");
    write_file(&key, "key");

    let mut names = vec![
        next_event(&watcher).await.name,
        next_event(&watcher).await.name,
    ];
    names.sort();
    let mut expected = vec![cert.clone(), key.clone()];
    expected.sort();
    assert_eq!(names, expected);

    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_watcher_is_noop() {
    let watcher = Watcher::new(Vec::<PathBuf>::new(), WatcherConfig::testing()).unwrap();
    assert!(watcher.tracked_paths().is_empty());
    assert_quiet(&watcher).await;
    watcher.close().await.unwrap();
}

#[tokio::test]
async fn test_close_while_send_is_blocked() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("unread");
    write_file(&file, "nobody reads this");

    let watcher = watch(&[&file]);
    let events = watcher.events().clone();

    // Give the loop time to block on the unread event
    tokio::time::sleep(Duration::from_millis(300)).await;

    timeout(Duration::from_secs(1), watcher.close())
        .await
        .expect("close should not hang on a blocked send")
        .unwrap();

    // The loop has exited and dropped its sender
    assert!(matches!(
        events.try_recv(),
        Err(flume::TryRecvError::Disconnected)
    ));
}

#[tokio::test]
async fn test_drop_stops_poll_loop() {
    let temp_dir = TempDir::new().unwrap();
    let watcher = watch(&[&temp_dir.path().join("never-created")]);
    let events = watcher.events().clone();

    drop(watcher);

    let result = timeout(Duration::from_secs(1), events.recv_async())
        .await
        .expect("poll loop should exit after drop");
    assert!(result.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_repoint_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a");
    let b = temp_dir.path().join("b");
    write_file(&a, "first target");
    write_file(&b, "second target");
    let link = temp_dir.path().join("current");
    point_symlink(&a, &link);

    let watcher = watch(&[&link]);
    assert_eq!(
        next_event(&watcher).await,
        Event::new(&link, Op::CREATE | Op::WRITE)
    );
    assert_quiet(&watcher).await;

    // Repoint between two existing targets
    point_symlink(&b, &link);
    assert_eq!(next_event(&watcher).await, Event::new(&link, Op::WRITE));
    assert_quiet(&watcher).await;

    // Repoint to a target that does not exist
    point_symlink(temp_dir.path().join("missing"), &link);
    assert_eq!(next_event(&watcher).await, Event::new(&link, Op::REMOVE));
    assert_quiet(&watcher).await;

    // And back to an existing one
    point_symlink(&a, &link);
    assert_eq!(
        next_event(&watcher).await,
        Event::new(&link, Op::CREATE | Op::WRITE)
    );

    watcher.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_file_replaced_by_symlink_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tls.crt");
    write_file(&path, "inline cert");
    let target = temp_dir.path().join("mounted.crt");
    write_file(&target, "mounted cert");

    let watcher = watch(&[&path]);
    assert_eq!(
        next_event(&watcher).await,
        Event::new(&path, Op::CREATE | Op::WRITE)
    );
    assert_quiet(&watcher).await;

    point_symlink("mounted.crt", &path);
    assert_eq!(
        next_event(&watcher).await,
        Event::new(&path, Op::CREATE | Op::WRITE)
    );
    assert_quiet(&watcher).await;

    watcher.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_target_modified() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("target");
    write_file(&target, "v1");
    let link = temp_dir.path().join("link");
    point_symlink("target", &link);

    let watcher = watch(&[&link]);
    assert!(next_event(&watcher).await.has(Op::CREATE));

    write_file(&target, "version two");
    let event = next_event(&watcher).await;
    assert_eq!(event, Event::new(&link, Op::WRITE));
    assert_ne!(event.name, target);

    watcher.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_kubernetes_secret_mount_rotation() {
    // Layout produced by the kubelet for secret volumes:
    //   tls.crt -> ..data/tls.crt
    //   ..data  -> ..2024_01_01
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir(root.join("..2024_01_01")).unwrap();
    write_file(&root.join("..2024_01_01/tls.crt"), "first certificate");
    point_symlink("..2024_01_01", &root.join("..data"));
    let cert = root.join("tls.crt");
    point_symlink("..data/tls.crt", &cert);

    let watcher = watch(&[&cert]);
    assert_eq!(
        next_event(&watcher).await,
        Event::new(&cert, Op::CREATE | Op::WRITE)
    );

    // Rotation swaps ..data; tls.crt itself is untouched
    std::fs::create_dir(root.join("..2024_02_01")).unwrap();
    write_file(
        &root.join("..2024_02_01/tls.crt"),
        "second, rotated certificate",
    );
    point_symlink("..2024_02_01", &root.join("..data"));

    assert_eq!(next_event(&watcher).await, Event::new(&cert, Op::WRITE));
    assert_quiet(&watcher).await;

    watcher.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_dangling_symlink_removal_reports_once() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("target");
    write_file(&target, "data");
    let link = temp_dir.path().join("link");
    point_symlink(&target, &link);

    let watcher = watch(&[&link]);
    assert!(next_event(&watcher).await.has(Op::CREATE));

    std::fs::remove_file(&target).unwrap();
    assert_eq!(next_event(&watcher).await, Event::new(&link, Op::REMOVE));

    std::fs::remove_file(&link).unwrap();
    assert_quiet(&watcher).await;

    watcher.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_dangling_symlink_emits_nothing_until_target_exists() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("later");
    let link = temp_dir.path().join("link");
    point_symlink(&target, &link);

    let watcher = watch(&[&link]);
    assert_quiet(&watcher).await;

    write_file(&target, "");
    assert_eq!(next_event(&watcher).await, Event::new(&link, Op::CREATE));

    watcher.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_stat_error_does_not_block_other_paths() {
    let temp_dir = TempDir::new().unwrap();
    let looped = temp_dir.path().join("loop");
    std::os::unix::fs::symlink("loop", &looped).unwrap();
    let broken = looped.join("child");
    let file = temp_dir.path().join("file");
    write_file(&file, "content");

    let watcher = watch(&[&broken, &file]);

    let mut saw_error = false;
    let mut saw_event = false;
    while !(saw_error && saw_event) {
        match next_item(&watcher).await {
            Item::Error(error) => {
                assert!(matches!(error, Error::Stat { .. }), "got {error:?}");
                assert_eq!(error.path(), Some(broken.as_path()));
                saw_error = true;
            }
            Item::Event(event) => {
                assert_eq!(event, Event::new(&file, Op::CREATE | Op::WRITE));
                saw_event = true;
            }
        }
    }

    watcher.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_target_error_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let looped = temp_dir.path().join("loop");
    std::os::unix::fs::symlink("loop", &looped).unwrap();

    let watcher = watch(&[&looped]);

    match next_item(&watcher).await {
        Item::Error(error) => {
            assert!(matches!(error, Error::TargetStat { .. }), "got {error:?}");
            assert_eq!(error.path(), Some(looped.as_path()));
        }
        Item::Event(event) => panic!("Expected error, got {event:?}"),
    }

    // Errors repeat on later cycles; they never turn into events
    assert_quiet(&watcher).await;

    watcher.close().await.unwrap();
}
