pub mod dma;
pub mod iso_endpoint;
pub mod pcm_fifo;
