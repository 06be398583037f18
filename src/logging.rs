//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (stm32f7 feature): Uses defmt
//! - Host tests: Uses println!
//! - Host non-test: No-op

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32f7")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "stm32f7"), test))]
        println!("[INFO] {}", format!($($arg)*));
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32f7")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "stm32f7"), test))]
        println!("[WARN] {}", format!($($arg)*));
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32f7")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "stm32f7"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32f7")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "stm32f7"), test))]
        println!("[DEBUG] {}", format!($($arg)*));
    }};
}
