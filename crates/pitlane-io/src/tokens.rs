// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Whitespace tokenizer shared by the roads file and the legacy object list.

use std::str::FromStr;

/// Splits text into whitespace separated tokens.
///
/// A token starting with `#` opens a comment running to the end of its line.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    text: String,
    pos: usize,
}

impl Tokenizer {
    /// Creates a tokenizer over owned text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
        }
    }

    /// Returns the next token, or `None` at the end of the text.
    pub fn next_token(&mut self) -> Option<&str> {
        loop {
            let rest = &self.text[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.starts_with('#') {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
                continue;
            }
            let len = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            let start = self.pos;
            self.pos += len;
            return Some(&self.text[start..start + len]);
        }
    }

    /// Returns the next token parsed as `T`.
    ///
    /// `None` at the end of the text, `Some(Err(token))` if it does not parse.
    pub fn next_parsed<T: FromStr>(&mut self) -> Option<Result<T, String>> {
        let token = self.next_token()?;
        Some(token.parse().map_err(|_| token.to_string()))
    }

    /// Returns `true` once every token has been consumed.
    pub fn is_exhausted(&mut self) -> bool {
        let saved = self.pos;
        let done = self.next_token().is_none();
        self.pos = saved;
        done
    }
}

impl Iterator for Tokenizer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_token().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_skip_to_end_of_line() {
        let tokens: Vec<_> = Tokenizer::new("a b # c d\n#e\n  f\tg #").collect();
        assert_eq!(tokens, vec!["a", "b", "f", "g"]);
    }

    #[test]
    fn test_parsed_tokens() {
        let mut tokens = Tokenizer::new("3 x");
        assert_eq!(tokens.next_parsed::<i32>(), Some(Ok(3)));
        assert_eq!(tokens.next_parsed::<i32>(), Some(Err("x".to_string())));
        assert!(tokens.is_exhausted());
        assert_eq!(tokens.next_parsed::<i32>(), None);
    }
}
