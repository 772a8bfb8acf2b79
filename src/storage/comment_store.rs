use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::errors::{StoreError, StoreResult};
use crate::common::{Comment, NewComment, order_newest_first};

const COMMENTS_FILE: &str = "comments.json";
const LOCK_FILE: &str = "comments.lock";

/// Append-only comment persistence with live snapshot subscriptions.
///
/// Implementations assign the record id and the timestamp. Every snapshot,
/// whether returned by [`CommentStore::snapshot`] or delivered to a
/// subscriber, holds the full result set ordered newest first.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment and return the stored record.
    async fn create(&self, new_comment: NewComment) -> StoreResult<Comment>;

    /// Current comments, newest first.
    async fn snapshot(&self) -> StoreResult<Vec<Comment>>;

    /// Open a standing query. The receiver starts at the current snapshot
    /// and sees a full replacement on every change.
    fn subscribe(&self) -> StoreResult<watch::Receiver<Vec<Comment>>>;
}

/// Comment store kept as a JSON document in a board directory.
///
/// ## Layout
///
/// - `{board_dir}/comments.json`: every comment in insertion order
/// - `{board_dir}/comments.lock`: held exclusively for each read-modify-write
///
/// Writes replace the file atomically while holding the lock file, so handles
/// in other tasks or processes never overwrite each other. Writes made
/// through a handle are published to its subscribers immediately; writes made
/// by other processes are picked up by
/// [`LocalCommentStore::spawn_change_watcher`].
#[derive(Clone)]
pub struct LocalCommentStore {
    inner: Arc<Inner>,
}

struct Inner {
    board_dir: PathBuf,
    file: PathBuf,
    lock_file: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
    snapshots: watch::Sender<Vec<Comment>>,
    file_stamp: Mutex<Option<FileStamp>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

impl LocalCommentStore {
    /// Open an existing board directory.
    pub async fn open<P: AsRef<Path>>(board_dir: P) -> StoreResult<Self> {
        let board_dir = board_dir.as_ref().to_path_buf();
        let file = board_dir.join(COMMENTS_FILE);

        if !file.exists() {
            return Err(StoreError::init(format!(
                "no comment board at {}",
                board_dir.display()
            )));
        }

        Self::load(board_dir, file).await
    }

    /// Create the board directory and an empty comment file if missing.
    pub async fn init<P: AsRef<Path>>(board_dir: P) -> StoreResult<Self> {
        let board_dir = board_dir.as_ref().to_path_buf();
        let file = board_dir.join(COMMENTS_FILE);

        let (dir, path) = (board_dir.clone(), file.clone());
        blocking(move || {
            fs::create_dir_all(&dir)?;
            with_file_lock(&dir.join(LOCK_FILE), || {
                if !path.exists() {
                    write_comments(&dir, &path, &[])?;
                }
                Ok(())
            })
        })
        .await?;

        Self::load(board_dir, file).await
    }

    pub async fn open_or_init<P: AsRef<Path>>(board_dir: P) -> StoreResult<Self> {
        match Self::open(&board_dir).await {
            Ok(store) => Ok(store),
            Err(StoreError::Init { .. }) => Self::init(board_dir).await,
            Err(e) => Err(e),
        }
    }

    async fn load(board_dir: PathBuf, file: PathBuf) -> StoreResult<Self> {
        let path = file.clone();
        let (comments, stamp) = blocking(move || {
            let comments = read_comments(&path)?;
            Ok((comments, file_stamp(&path)?))
        })
        .await?;

        debug!(
            "Loaded {} comments from {}",
            comments.len(),
            file.display()
        );

        let (snapshots, _) = watch::channel(order_newest_first(comments));

        Ok(Self {
            inner: Arc::new(Inner {
                lock_file: board_dir.join(LOCK_FILE),
                board_dir,
                file,
                write_lock: tokio::sync::Mutex::new(()),
                snapshots,
                file_stamp: Mutex::new(Some(stamp)),
            }),
        })
    }

    /// Re-read the comment file when it changes on disk and publish the new
    /// snapshot. The task ends once every subscriber is gone.
    pub fn spawn_change_watcher(&self, interval: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = inner.snapshots.closed() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = inner.reload_if_changed().await {
                            warn!("Failed to reload {}: {}", inner.file.display(), e);
                        }
                    }
                }
            }

            debug!("Change watcher for {} stopped", inner.file.display());
        })
    }
}

impl Inner {
    async fn reload_if_changed(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let path = self.file.clone();
        let stamp = blocking(move || file_stamp(&path)).await?;
        if self.stamp() == Some(stamp) {
            return Ok(());
        }

        let path = self.file.clone();
        let comments = blocking(move || read_comments(&path)).await?;
        self.set_stamp(stamp);
        self.publish(comments);
        Ok(())
    }

    fn publish(&self, comments: Vec<Comment>) {
        let ordered = order_newest_first(comments);
        self.snapshots.send_if_modified(|current| {
            if *current == ordered {
                false
            } else {
                *current = ordered;
                true
            }
        });
    }

    fn stamp(&self) -> Option<FileStamp> {
        self.file_stamp.lock().ok().and_then(|stamp| *stamp)
    }

    fn set_stamp(&self, stamp: FileStamp) {
        if let Ok(mut current) = self.file_stamp.lock() {
            *current = Some(stamp);
        }
    }
}

#[async_trait]
impl CommentStore for LocalCommentStore {
    async fn create(&self, new_comment: NewComment) -> StoreResult<Comment> {
        if new_comment.name.trim().is_empty() || new_comment.message.trim().is_empty() {
            return Err(StoreError::rejected("name and message must not be blank"));
        }

        let inner = &self.inner;
        let _guard = inner.write_lock.lock().await;

        let comment = Comment::from_new(uuid::Uuid::new_v4().to_string(), new_comment, Utc::now());

        // Re-read under the file lock so writes from other handles are kept
        let (dir, path, lock_path, record) = (
            inner.board_dir.clone(),
            inner.file.clone(),
            inner.lock_file.clone(),
            comment.clone(),
        );
        let (comments, stamp) = blocking(move || {
            with_file_lock(&lock_path, || {
                let mut comments = read_comments(&path)?;
                comments.push(record);
                write_comments(&dir, &path, &comments)?;
                Ok((comments, file_stamp(&path)?))
            })
        })
        .await?;

        inner.set_stamp(stamp);
        inner.publish(comments);

        info!("Created comment {} by {}", comment.id, comment.name);
        Ok(comment)
    }

    async fn snapshot(&self) -> StoreResult<Vec<Comment>> {
        let path = self.inner.file.clone();
        let comments = blocking(move || read_comments(&path)).await?;
        Ok(order_newest_first(comments))
    }

    fn subscribe(&self) -> StoreResult<watch::Receiver<Vec<Comment>>> {
        Ok(self.inner.snapshots.subscribe())
    }
}

async fn blocking<T, F>(f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
}

/// Run `f` while holding an exclusive OS lock on `lock_path`. Blocks, so call
/// it from [`blocking`].
fn with_file_lock<T>(lock_path: &Path, f: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)?;
    let mut lock = fd_lock::RwLock::new(file);
    let _held = lock.write()?;
    f()
}

fn read_comments(path: &Path) -> StoreResult<Vec<Comment>> {
    let content = fs::read(path)?;
    serde_json::from_slice(&content).map_err(|e| StoreError::corrupt(path, e.to_string()))
}

fn write_comments(dir: &Path, path: &Path, comments: &[Comment]) -> StoreResult<()> {
    let json = serde_json::to_vec_pretty(comments)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
    temp_file.write_all(&json)?;
    temp_file.flush()?;
    temp_file
        .persist(path)
        .map_err(|e| StoreError::Io(e.error))?;

    Ok(())
}

fn file_stamp(path: &Path) -> StoreResult<FileStamp> {
    let metadata = fs::metadata(path)?;
    Ok(FileStamp {
        modified: metadata.modified()?,
        len: metadata.len(),
    })
}
