//! Terminal messages for CLI commands. Rendered fragments go to stdout, so
//! everything here writes to stderr.

macro_rules! print_cmd_error {
    ($msg:expr) => {
        eprintln!("\x1b[1;31m[ERROR] {}\x1b[0m", $msg);
    };
    ($msg:expr, $($tts:tt)+) => {
        eprintln!("\x1b[1;31m[ERROR] {}\x1b[0m", $msg);
        eprintln!("{}", core::format_args!($($tts)*));
    }
}

macro_rules! print_cmd_info {
    ($msg:expr) => {
        eprintln!("\x1b[1;33m[INFO] {}\x1b[0m", $msg);
    };
    ($msg:expr, $($tts:tt)*) => {
        eprintln!("\x1b[1;33m[INFO] {}\x1b[0m", $msg);
        eprintln!("{}", core::format_args!($($tts)*));
    }
}

macro_rules! print_cmd_success {
    ($msg:expr) => {
        eprintln!("\x1b[1;32m[OK] {}\x1b[0m", $msg);
    };
}

/// Hint printed when the server could not be reached at all.
pub(crate) fn print_unreachable_hint(server_url: &str) {
    // RGB: FF = 255, AA = 170, 00 = 0
    eprintln!(
        "\x1b[38;2;255;170;0mServer at {} is not responding.\x1b[0m",
        server_url
    );
    eprintln!("Check that it is running with `quant-dash service status`.\n");
}

pub(crate) use print_cmd_error;
pub(crate) use print_cmd_info;
pub(crate) use print_cmd_success;
