use embassy_time::Duration;

/// Time the module keeps accepting body bytes after the `DOWNLOAD` prompt
pub const fn upload_window() -> Duration {
    Duration::from_secs(10)
}

/// Time to wait for the final `OK` after the last body byte was written
pub const fn upload_ack_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Time to receive the raw data announced by a `+HTTPREAD: DATA` header
pub const fn read_data_timeout() -> Duration {
    Duration::from_secs(2)
}

/// Time to wait for the `+HTTPREAD: 0` line closing a chunk
pub const fn read_end_timeout() -> Duration {
    Duration::from_secs(1)
}
