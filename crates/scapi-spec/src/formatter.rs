/// Indentation-aware string builder, two spaces per level.
#[derive(Debug, Default)]
pub struct Formatter {
    out: String,
    level: usize,
    pending: String,
}

const INDENT: &str = "  ";

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Write one indented line. An empty line gets no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.write_indent();
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Append to the line under construction; see [`flush`](Self::flush).
    pub fn partial(&mut self, text: impl AsRef<str>) {
        self.pending.push_str(text.as_ref());
    }

    /// Emit the line built by [`partial`](Self::partial) calls, if any.
    pub fn flush(&mut self) {
        if !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            self.line(pending);
        }
    }

    pub fn finish(mut self) -> String {
        self.flush();
        self.out
    }

    fn write_indent(&mut self) {
        for _ in 0..self.level {
            self.out.push_str(INDENT);
        }
    }
}
