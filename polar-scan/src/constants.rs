pub(crate) const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub(crate) const DEFAULT_BAUD_RATE: u32 = 115200;
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 100;
pub(crate) const DEFAULT_SAVE_DIR: &str = "data";
pub(crate) const DEFAULT_CANVAS_SIZE: u32 = 800;
/// Accepted samples between two record files.
pub(crate) const BUFFER_SIZE: usize = 1000;
pub(crate) const FRAME_DELIMITER: char = ',';
/// Longest run of bytes kept while waiting for a newline.
pub(crate) const MAX_FRAME_LEN: usize = 64;
pub(crate) const READ_CHUNK_SIZE: usize = 256;
pub(crate) const READER_CHANNEL_CAPACITY: usize = 200;
pub(crate) const RECORD_PREFIX: &str = "test_";
pub(crate) const RECORD_EXTENSION: &str = "csv";
pub(crate) const MARKER_RADIUS: f64 = 10.;
// pygame "gray23"
pub(crate) const BACKGROUND_COLOR: [f32; 4] = [59. / 255., 59. / 255., 59. / 255., 1.];
pub(crate) const FOREGROUND_COLOR: [f32; 4] = [1., 1., 1., 1.];
