use std::io::{BufRead, Write};

use crate::libs::cluster::GapChain;

/// One exact match between a reference and a query string.
///
/// Coordinates are whatever the upstream matcher printed (`mummer` uses 1-based starts);
/// the match covers `len` positions on both strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Match {
    pub r_start: i64,
    pub q_start: i64,
    pub len: i64,
    /// Representative of the connected component, set by the clustering pass
    pub cluster: usize,
}

impl Match {
    pub fn new(r_start: i64, q_start: i64, len: i64) -> Self {
        Self {
            r_start,
            q_start,
            len,
            cluster: 0,
        }
    }

    pub fn r_end(&self) -> i64 {
        self.r_start + self.len
    }

    pub fn q_end(&self) -> i64 {
        self.q_start + self.len
    }

    /// Matches on the same diagonal are colinear.
    pub fn diagonal(&self) -> i64 {
        self.q_start - self.r_start
    }
}

impl std::str::FromStr for Match {
    type Err = anyhow::Error;

    /// Parses `r_start q_start len`. Exactly three integer fields are required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 3 {
            anyhow::bail!("Expected 3 fields, got {}", fields.len());
        }

        let r_start = fields[0].parse::<i64>()?;
        let q_start = fields[1].parse::<i64>()?;
        let len = fields[2].parse::<i64>()?;

        Ok(Match::new(r_start, q_start, len))
    }
}

/// All matches reported for one query sequence, under its `>` header line.
///
/// The header is kept as raw bytes so it can be echoed verbatim.
#[derive(Debug, Clone, Default)]
pub struct MumBlock {
    pub header: Vec<u8>,
    pub matches: Vec<Match>,
}

impl MumBlock {
    pub fn header_contains(&self, marker: &str) -> bool {
        let marker = marker.as_bytes();
        marker.is_empty() || self.header.windows(marker.len()).any(|w| w == marker)
    }

    /// Header for messages; invalid UTF-8 is replaced.
    pub fn label(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.header)
    }
}

fn parse_match(line: &[u8]) -> Option<Match> {
    std::str::from_utf8(line).ok()?.parse().ok()
}

/// Reads `mummer`-style output block by block.
///
/// Lines before the first header are skipped, and data lines that are not
/// exactly three integers are ignored. Input need not be valid UTF-8.
pub struct MumReader<R> {
    reader: R,
    line_buf: Vec<u8>,
    // line_buf holds the header of the next block
    pending: bool,
}

impl<R: BufRead> MumReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: Vec::new(),
            pending: false,
        }
    }

    fn read_line(&mut self) -> std::io::Result<usize> {
        self.line_buf.clear();
        self.reader.read_until(b'\n', &mut self.line_buf)
    }

    fn current_line(&self) -> &[u8] {
        self.line_buf
            .strip_suffix(b"\n")
            .unwrap_or(&self.line_buf)
    }

    /// Fills `block` with the next header and its matches, reusing its buffers.
    ///
    /// Returns `false` at the end of input.
    pub fn read_block(&mut self, block: &mut MumBlock) -> anyhow::Result<bool> {
        if !self.pending {
            loop {
                if self.read_line()? == 0 {
                    return Ok(false);
                }
                if self.line_buf.starts_with(b">") {
                    break;
                }
                log::trace!(
                    "Skip line before first header: {}",
                    String::from_utf8_lossy(self.current_line())
                );
            }
        }
        self.pending = false;

        block.header.clear();
        block.header.extend_from_slice(self.current_line());
        block.matches.clear();

        while self.read_line()? > 0 {
            if self.line_buf.starts_with(b">") {
                self.pending = true;
                break;
            }
            match parse_match(self.current_line()) {
                Some(m) => block.matches.push(m),
                None => log::trace!("Skip line: {}", String::from_utf8_lossy(self.current_line())),
            }
        }

        Ok(true)
    }
}

/// Writes the chains found for one block.
///
/// The header precedes the first chain and `#` each later one. A block
/// without chains still gets its header line.
pub fn write_block<W: Write + ?Sized>(
    writer: &mut W,
    header: &[u8],
    chains: &[GapChain],
) -> std::io::Result<()> {
    if chains.is_empty() {
        writer.write_all(header)?;
        writer.write_all(b"\n")?;
        return Ok(());
    }

    for (i, chain) in chains.iter().enumerate() {
        if i == 0 {
            writer.write_all(header)?;
            writer.write_all(b"\n")?;
        } else {
            writeln!(writer, "#")?;
        }
        write!(writer, "{}", chain)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::cluster::ChainLink;
    use std::io::Cursor;

    fn read_all(input: &[u8]) -> Vec<MumBlock> {
        let mut reader = MumReader::new(Cursor::new(input));
        let mut blocks = vec![];
        let mut block = MumBlock::default();
        while reader.read_block(&mut block).unwrap() {
            blocks.push(block.clone());
        }
        blocks
    }

    #[test]
    fn test_match_parse() {
        let m: Match = "  1234   5678    31".parse().unwrap();
        assert_eq!(m, Match::new(1234, 5678, 31));
        assert_eq!(m.r_end(), 1265);
        assert_eq!(m.q_end(), 5709);
        assert_eq!(m.diagonal(), 4444);

        assert!("abc def".parse::<Match>().is_err());
        assert!("1 2".parse::<Match>().is_err());
        assert!("1 2 3 4".parse::<Match>().is_err());
        assert!("1 2 x".parse::<Match>().is_err());
        assert!("".parse::<Match>().is_err());
    }

    #[test]
    fn test_reader_blocks() {
        let input = b"\
garbage before header
1 1 1
> seq1
   10   20   30
abc def
   40   50   60
> seq1 Reverse
> seq2
1 2 3
";
        let blocks = read_all(input);
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].header, b"> seq1");
        assert_eq!(
            blocks[0].matches,
            vec![Match::new(10, 20, 30), Match::new(40, 50, 60)]
        );

        assert_eq!(blocks[1].header, b"> seq1 Reverse");
        assert!(blocks[1].header_contains("Reverse"));
        assert!(!blocks[0].header_contains("Reverse"));
        assert!(blocks[1].matches.is_empty());

        assert_eq!(blocks[2].header, b"> seq2");
        assert_eq!(blocks[2].matches, vec![Match::new(1, 2, 3)]);
    }

    #[test]
    fn test_reader_crlf_and_no_header() {
        // headers are kept as is, data lines tolerate the CR
        let blocks = read_all(b">h\r\n1 2 3\r\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header, b">h\r");
        assert_eq!(blocks[0].matches, vec![Match::new(1, 2, 3)]);

        assert!(read_all(b"1 2 3\n4 5 6\n").is_empty());
        assert!(read_all(b"").is_empty());
    }

    #[test]
    fn test_reader_non_utf8() {
        let input = b"\xff before\n>h1 caf\xe9\n0 0 300\n\xff\xfe annotation\n>h2\n10 10 250\n";
        let blocks = read_all(input);
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].header, b">h1 caf\xe9");
        assert_eq!(blocks[0].label(), ">h1 caf\u{fffd}");
        assert_eq!(blocks[0].matches, vec![Match::new(0, 0, 300)]);

        assert_eq!(blocks[1].header, b">h2");
        assert_eq!(blocks[1].matches, vec![Match::new(10, 10, 250)]);
    }

    #[test]
    fn test_reader_reuses_block() {
        let mut reader = MumReader::new(Cursor::new(&b">a\n1 2 3\n4 5 6\n>b\n"[..]));
        let mut block = MumBlock::default();

        assert!(reader.read_block(&mut block).unwrap());
        assert_eq!(block.matches.len(), 2);
        let capacity = block.matches.capacity();

        assert!(reader.read_block(&mut block).unwrap());
        assert_eq!(block.header, b">b");
        assert!(block.matches.is_empty());
        assert_eq!(block.matches.capacity(), capacity);

        assert!(!reader.read_block(&mut block).unwrap());
    }

    #[test]
    fn test_write_block_raw_header() {
        let chain = GapChain {
            links: vec![ChainLink {
                r_start: 0,
                q_start: 0,
                len: 300,
                adj: 0,
                gap: None,
            }],
            score: 300,
        };

        let mut out: Vec<u8> = vec![];
        write_block(&mut out, b">h1 caf\xe9", &[chain.clone(), chain]).unwrap();
        let mut expected = b">h1 caf\xe9\n".to_vec();
        expected.extend_from_slice(b"       0        0    300    none      -      -\n#\n");
        expected.extend_from_slice(b"       0        0    300    none      -      -\n");
        assert_eq!(out, expected);

        let mut out: Vec<u8> = vec![];
        write_block(&mut out, b">empty", &[]).unwrap();
        assert_eq!(out, b">empty\n");
    }
}
