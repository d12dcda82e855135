//! Backend collaborators for the application shell.

pub mod insight;
