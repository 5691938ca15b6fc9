pub mod blobs;
pub mod handlers;
pub mod home;
pub mod load;
pub mod render;
pub mod session;
