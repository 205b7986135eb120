//! Console setup and the closing acknowledgment prompt.

use std::io::{self, BufRead, IsTerminal, Write};

/// Switch the console to UTF-8 (code page 65001) so CJK and emoji output renders.
#[cfg(windows)]
pub fn force_utf8() {
    use windows_sys::Win32::System::Console::{SetConsoleCP, SetConsoleOutputCP};
    const CP_UTF8: u32 = 65001;
    #[allow(unsafe_code)]
    unsafe {
        SetConsoleOutputCP(CP_UTF8);
        SetConsoleCP(CP_UTF8);
    }
}

/// Unix terminals are UTF-8 already; children still get PYTHONUTF8 from activation.
#[cfg(not(windows))]
pub fn force_utf8() {}

/// Whether to hold the window open before exiting.
pub fn should_pause(disabled: bool) -> bool {
    pause_wanted(disabled, io::stdin().is_terminal())
}

fn pause_wanted(disabled: bool, stdin_is_tty: bool) -> bool {
    !disabled && stdin_is_tty
}

/// Block until the user presses Enter (or stdin closes).
pub fn wait_for_ack() {
    eprint!("Press Enter to exit...");
    let _ = io::stderr().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_wanted() {
        assert!(pause_wanted(false, true));
        assert!(!pause_wanted(true, true));
        assert!(!pause_wanted(false, false), "never block without a terminal");
    }
}
