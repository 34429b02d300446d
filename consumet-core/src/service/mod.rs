pub mod content;

pub use content::ContentService;
