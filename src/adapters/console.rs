use crate::domain::ports::Console;
use parking_lot::Mutex;

/// 直接寫到標準輸出 / 標準錯誤
#[derive(Debug, Clone, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn line(&self, text: &str) {
        println!("{}", text);
    }

    fn error_line(&self, text: &str) {
        eprintln!("{}", text);
    }
}

/// 把輸出留在記憶體中，測試時用來比對課程輸出
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// 符合條件的行，保留原本順序
    pub fn lines_matching(&self, pattern: &str) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|line| line.contains(pattern))
            .cloned()
            .collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines.lock().iter().any(|line| line == text)
    }
}

impl Console for MemoryConsole {
    fn line(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }

    fn error_line(&self, text: &str) {
        self.lines.lock().push(format!("[stderr] {}", text));
    }
}
