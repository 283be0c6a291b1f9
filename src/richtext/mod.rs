pub mod checkbox;
pub mod continuation;
pub mod history;
pub mod intent;
pub mod layout;
pub mod lists;
pub mod markers;
pub mod plain_text;
pub mod publisher;
pub mod structured_document;
pub mod structured_editor;
