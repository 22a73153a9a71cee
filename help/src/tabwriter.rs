//! Column-aligning writer for help text.
//!
//! Text is buffered until [`flush`](std::io::Write::flush). Each line is
//! split into tab-terminated cells; consecutive lines that have a cell in the
//! same column form a block, and every cell in a block is padded to the
//! block's width. Text after the last tab of a line is written unpadded, and
//! a line without tabs ends every open block.

use std::io::{self, Write};

/// Minimum cell width, padding included.
pub const MIN_WIDTH: usize = 1;
/// Tab stop width, used when padding with tabs.
pub const TAB_WIDTH: usize = 8;
/// Padding added to the widest cell of a block.
pub const PADDING: usize = 2;

/// A writer that aligns tab-separated columns.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use command_help::TabWriter;
///
/// let mut out = Vec::new();
/// let mut w = TabWriter::new(&mut out);
/// write!(w, "build, b\tBuilds.\nrun\tRuns.\n").unwrap();
/// w.flush().unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "build, b  Builds.\nrun       Runs.\n");
/// ```
#[derive(Debug)]
pub struct TabWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
    min_width: usize,
    tab_width: usize,
    padding: usize,
    pad_char: char,
}

impl<W: Write> TabWriter<W> {
    /// Creates a writer with the help-text settings (min width 1, tab width
    /// 8, padding 2, space padding).
    pub fn new(inner: W) -> Self {
        Self::with_settings(inner, MIN_WIDTH, TAB_WIDTH, PADDING, ' ')
    }

    pub fn with_settings(
        inner: W,
        min_width: usize,
        tab_width: usize,
        padding: usize,
        pad_char: char,
    ) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            min_width,
            tab_width,
            padding,
            pad_char,
        }
    }

    /// Returns the wrapped writer, dropping any unflushed text.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn format(&self, text: &str) -> String {
        let lines: Vec<Vec<&str>> = text.split('\n').map(|l| l.split('\t').collect()).collect();
        let mut out = Vec::with_capacity(lines.len());
        self.format_block(&mut out, &lines, &mut Vec::new());
        out.join("\n")
    }

    fn format_block(&self, out: &mut Vec<String>, lines: &[Vec<&str>], widths: &mut Vec<usize>) {
        let column = widths.len();
        let mut start = 0;
        let mut this = 0;

        while this < lines.len() {
            if !has_cell(&lines[this], column) {
                this += 1;
                continue;
            }

            self.write_lines(out, &lines[start..this], widths);
            start = this;

            let mut width = self.min_width;
            while this < lines.len() && has_cell(&lines[this], column) {
                width = width.max(cell_width(lines[this][column]) + self.padding);
                this += 1;
            }

            widths.push(width);
            self.format_block(out, &lines[start..this], widths);
            widths.pop();
            start = this;
        }

        self.write_lines(out, &lines[start..], widths);
    }

    fn write_lines(&self, out: &mut Vec<String>, lines: &[Vec<&str>], widths: &[usize]) {
        for cells in lines {
            let mut line = String::new();
            for (j, cell) in cells.iter().enumerate() {
                line.push_str(cell);
                if let Some(&width) = widths.get(j) {
                    self.pad(&mut line, cell_width(cell), width);
                }
            }
            out.push(line);
        }
    }

    fn pad(&self, line: &mut String, text_width: usize, cell_width: usize) {
        if self.pad_char == '\t' {
            if self.tab_width == 0 {
                return;
            }
            let cell_width = cell_width.div_ceil(self.tab_width) * self.tab_width;
            let tabs = cell_width.saturating_sub(text_width).div_ceil(self.tab_width);
            line.extend(std::iter::repeat_n('\t', tabs));
        } else {
            let n = cell_width.saturating_sub(text_width);
            line.extend(std::iter::repeat_n(self.pad_char, n));
        }
    }
}

/// A line has a cell in `column` when that column is tab-terminated.
fn has_cell(cells: &[&str], column: usize) -> bool {
    column + 1 < cells.len()
}

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}

impl<W: Write> Write for TabWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let text = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        let formatted = self.format(&text);
        self.inner.write_all(formatted.as_bytes())?;
        self.inner.flush()
    }
}
