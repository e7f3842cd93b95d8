//! UI building blocks.

use leptos::prelude::{LocalStorage, RwSignal};
use web_sys::File;

use crate::store::FileStore;

pub mod csv_table;
pub mod file_card;
pub mod force_graph;

/// Reactive handle on the session's file records. Local because browser
/// file handles cannot leave the main thread.
pub type FileStoreSignal = RwSignal<FileStore<File>, LocalStorage>;
