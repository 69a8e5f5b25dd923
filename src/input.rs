// SPDX-License-Identifier: AGPL-3.0-or-later
use std::io::{self, BufRead};
use std::thread;

use log::{debug, warn};
use tokio::sync::mpsc::Sender;

/// Reads one line, without its trailing `\n`. `Ok(None)` on EOF.
///
/// A final line with no newline is still returned.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(Some(line))
}

/// Blocking reader loop: forwards every non-empty line until EOF, a read
/// error, or the receiving side going away. Dropping `lines` on return is
/// the end-of-input marker.
pub fn forward_lines<R: BufRead>(mut reader: R, lines: Sender<String>) -> usize {
    let mut forwarded = 0;
    loop {
        let line = match read_line(&mut reader) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read error, treating as end of input: {}", e);
                break;
            }
        };
        if line.is_empty() {
            continue;
        }
        if lines.blocking_send(line).is_err() {
            debug!("line receiver closed, reader stopping");
            break;
        }
        forwarded += 1;
    }
    forwarded
}

/// Reads on a dedicated OS thread since stdin reads block.
pub fn spawn_line_reader<R>(reader: R, lines: Sender<String>) -> thread::JoinHandle<usize>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || forward_lines(reader, lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::sync::mpsc;

    fn collect(input: &'static [u8]) -> Vec<String> {
        let (tx, mut rx) = mpsc::channel(16);
        let n = forward_lines(Cursor::new(input), tx);
        let mut out = Vec::new();
        while let Ok(line) = rx.try_recv() {
            out.push(line);
        }
        assert_eq!(n, out.len());
        out
    }

    #[test]
    fn strips_newline_and_skips_empty_lines() {
        assert_eq!(collect(b"hello\n\nworld\n\n"), ["hello", "world"]);
    }

    #[test]
    fn keeps_unterminated_last_line() {
        assert_eq!(collect(b"a\nb"), ["a", "b"]);
    }

    #[test]
    fn only_newline_is_stripped() {
        assert_eq!(collect(b"crlf\r\n  \n"), ["crlf\r", "  "]);
    }

    #[test]
    fn invalid_utf8_ends_input() {
        assert_eq!(collect(b"ok\n\xff\xfe\nnever\n"), ["ok"]);
    }

    #[test]
    fn empty_input_closes_channel() {
        let (tx, mut rx) = mpsc::channel(1);
        assert_eq!(forward_lines(Cursor::new(&b""[..]), tx), 0);
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert_eq!(forward_lines(Cursor::new(&b"a\nb\n"[..]), tx), 0);
    }

    #[tokio::test]
    async fn reader_thread_feeds_async_receiver() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = spawn_line_reader(Cursor::new(&b"one\ntwo\n"[..]), tx);
        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
        assert_eq!(rx.recv().await, None);
        assert_eq!(handle.join().unwrap(), 2);
    }
}
