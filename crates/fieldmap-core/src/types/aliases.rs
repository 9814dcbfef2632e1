//! Type aliases for commonly used complex types.
//!
//! The editor state is shared between the host message handler, the
//! metadata prompt and the export pipeline. These aliases keep the
//! lock flavour in one place.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fieldmap_core::types::*;
//!
//! // Instead of: Arc<Mutex<EditorState>>
//! let editor: ThreadSafe<EditorState> = thread_safe(EditorState::new());
//! editor.lock().toggle_basemap();
//! ```

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-task sharing.
///
/// Uses `parking_lot::Mutex`; guards must not be held across `.await`.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A reader-writer hash map, used for the event bus subscriber table.
pub type ThreadSafeRwMap<K, V> = Arc<RwLock<HashMap<K, V>>>;

/// A callback that receives a single parameter.
pub type DataCallback<T> = Box<dyn Fn(T) + Send + Sync>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new empty `ThreadSafeRwMap<K, V>`.
#[inline]
pub fn thread_safe_rw_map<K, V>() -> ThreadSafeRwMap<K, V> {
    Arc::new(RwLock::new(HashMap::new()))
}
