pub mod video_upload;
