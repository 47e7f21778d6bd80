//! Splitting replies to fit Discord's message size limit.

/// Discord rejects messages longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Split `text` into pieces of at most `limit` characters.
///
/// Breaks happen on line boundaries where possible; a single line longer
/// than `limit` is cut at character boundaries. Empty input yields nothing.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed <= limit {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len += needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            let chars: Vec<char> = line.chars().collect();
            let mut pieces = chars.chunks(limit).map(|c| c.iter().collect::<String>());
            // the last piece may still share a chunk with following lines
            let mut last = pieces.next_back().unwrap_or_default();
            chunks.extend(pieces);
            current_len = last.chars().count();
            std::mem::swap(&mut current, &mut last);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
