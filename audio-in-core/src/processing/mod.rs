pub mod frame_size;
pub mod occupancy;
pub mod sample_buffer;
