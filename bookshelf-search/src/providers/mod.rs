//! Concrete catalog backends.

pub mod open_library;

pub use open_library::OpenLibraryClient;
