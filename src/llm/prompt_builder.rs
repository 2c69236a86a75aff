use std::fs;
use std::path::Path;

use crate::error::ReviewError;
use crate::git::FileChange;

pub const FILES_PLACEHOLDER: &str = "{files}";
pub const DIFF_PLACEHOLDER: &str = "{diff}";

/// Starting per-file content cap (chars) once the prompt is over budget.
const INITIAL_FILE_CAP: usize = 8192;
/// Never cut a file block below this many chars.
const MIN_FILE_CAP: usize = 256;

/// Load the prompt template from disk.
pub fn load_template(path: &Path) -> Result<String, ReviewError> {
    fs::read_to_string(path).map_err(|e| {
        ReviewError::Configuration(format!(
            "cannot read prompt template {}: {e}",
            path.display()
        ))
    })
}

/// Render the final prompt from the template, file contents, and diff.
///
/// Budget policy: tokens are estimated as ceil(bytes / 4). If the full
/// rendering exceeds `token_budget`, a per-file character cap is halved from
/// 8192 down to a floor of 256 and applied uniformly to every file content
/// block until the prompt fits (or the floor is reached). The diff is the
/// primary review signal and is never shortened. The same inputs always
/// produce byte-identical output.
pub fn build(
    template: &str,
    files: &[FileChange],
    diff: &str,
    token_budget: usize,
) -> Result<String, ReviewError> {
    for placeholder in [FILES_PLACEHOLDER, DIFF_PLACEHOLDER] {
        if !template.contains(placeholder) {
            return Err(ReviewError::Template(format!(
                "template is missing the required {placeholder} placeholder"
            )));
        }
    }

    let mut prompt = substitute(template, &render_files(files, None), diff);
    if approx_tokens(&prompt) <= token_budget {
        return Ok(prompt);
    }

    let mut cap = INITIAL_FILE_CAP;
    loop {
        prompt = substitute(template, &render_files(files, Some(cap)), diff);
        if approx_tokens(&prompt) <= token_budget || cap <= MIN_FILE_CAP {
            break;
        }
        cap /= 2;
    }

    if approx_tokens(&prompt) > token_budget {
        log::warn!(
            "Prompt still ~{} tokens after truncating file blocks (budget {}); the diff is kept intact",
            approx_tokens(&prompt),
            token_budget
        );
    }

    Ok(prompt)
}

fn substitute(template: &str, files_block: &str, diff: &str) -> String {
    template
        .replace(FILES_PLACEHOLDER, files_block)
        .replace(DIFF_PLACEHOLDER, diff)
}

/// Render each file as a labeled, fenced block; blocks are blank-line separated.
fn render_files(files: &[FileChange], cap: Option<usize>) -> String {
    let blocks: Vec<String> = files
        .iter()
        .map(|file| {
            let content = match cap {
                Some(max) if file.content.len() > max => {
                    let prefix = truncate_at(&file.content, max);
                    format!(
                        "{}...\n[truncated {} chars]",
                        prefix,
                        file.content.len() - prefix.len()
                    )
                }
                _ => file.content.clone(),
            };
            format!("File: {}\nContent:\n```\n{}\n```", file.path, content)
        })
        .collect();

    blocks.join("\n\n")
}

/// Longest prefix of `s` that is at most `max_len` bytes and ends on a
/// char boundary.
fn truncate_at(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Rough token estimate: one token per four bytes.
fn approx_tokens(s: &str) -> usize {
    s.len().div_ceil(4)
}
