// Resume intake and rank control: multipart upload, analysis, scoring, storage,
// ranked insertion, manual moves and deletion.

pub mod handlers;
pub mod upload;
