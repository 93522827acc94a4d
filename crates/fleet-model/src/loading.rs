// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Ride instance loader.
//!
//! Instances are whitespace-delimited text: the number of rides `N` followed
//! by `N` pairs `start end`. Everything after a `#` up to the end of the line
//! is a comment. The loaded rides go through [`ModelBuilder::build`], so an
//! instance with a reversed ride is rejected with the position of that ride.
//!
//! ```raw
//! 3        # number of rides
//! 0 10     # ride 0
//! 5 15
//! 10 20
//! ```

use crate::model::{Model, ModelBuilder, ModelError};
use num_traits::{PrimInt, Signed};
use std::{
    fmt::{Debug, Display},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for loading ride instances.
#[derive(Debug, thiserror::Error)]
pub enum LoadError<T> {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unexpected end of file while parsing instance")]
    UnexpectedEof,
    #[error("Could not parse token '{token}' as type {type_name}")]
    Parse {
        token: String,
        type_name: &'static str,
    },
    #[error("The number of rides must be a positive integer, got '{0}'")]
    InvalidRideCount(String),
    #[error("Unexpected trailing token '{0}' after the last ride")]
    TrailingData(String),
    #[error("Invalid instance: {0}")]
    Model(#[from] ModelError<T>),
}

/// Loads ride instances from text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RideLoader {
    strict: bool,
}

impl RideLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject input that carries tokens after the last ride. Off by default,
    /// in which case trailing tokens are ignored.
    #[inline]
    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<T, R>(&self, rdr: R) -> Result<Model<T>, LoadError<T>>
    where
        T: PrimInt + Signed + FromStr + Display + Debug,
        R: BufRead,
    {
        let mut sc = Scanner::new(rdr);

        let count_token = sc.next_raw()?.ok_or(LoadError::UnexpectedEof)?;
        let n: usize = count_token
            .parse()
            .ok()
            .filter(|&n| n > 0)
            .ok_or(LoadError::InvalidRideCount(count_token))?;

        let mut builder = ModelBuilder::with_capacity(n);
        for _ in 0..n {
            let start: T = sc.next()?;
            let end: T = sc.next()?;
            builder.add_ride(start, end);
        }

        if self.strict {
            if let Some(token) = sc.next_raw()? {
                return Err(LoadError::TrailingData(token));
            }
        }

        Ok(builder.build()?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<T, P>(&self, path: P) -> Result<Model<T>, LoadError<T>>
    where
        T: PrimInt + Signed + FromStr + Display + Debug,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<T, R>(&self, r: R) -> Result<Model<T>, LoadError<T>>
    where
        T: PrimInt + Signed + FromStr + Display + Debug,
        R: Read,
    {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str<T>(&self, s: &str) -> Result<Model<T>, LoadError<T>>
    where
        T: PrimInt + Signed + FromStr + Display + Debug,
    {
        self.from_reader(s.as_bytes())
    }
}

/// Tokenizer failures, lifted into [`LoadError`] by the loader.
#[derive(Debug)]
enum ScanError {
    Io(std::io::Error),
    UnexpectedEof,
    Parse {
        token: String,
        type_name: &'static str,
    },
}

impl<T> From<ScanError> for LoadError<T> {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::Io(e) => LoadError::Io(e),
            ScanError::UnexpectedEof => LoadError::UnexpectedEof,
            ScanError::Parse { token, type_name } => LoadError::Parse { token, type_name },
        }
    }
}

/// Reads whitespace-delimited tokens, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    fn fill_line(&mut self) -> Result<bool, ScanError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf).map_err(ScanError::Io)?;
        Ok(n > 0)
    }

    /// Returns the byte range of the next token on the current line, if any.
    fn next_token_span(&self) -> Option<(usize, usize)> {
        let rest = &self.buf[self.pos..];
        let code = rest.split('#').next().unwrap_or("");
        let trimmed = code.trim_start();
        let token = trimmed.split_whitespace().next()?;
        let start = self.pos + (code.len() - trimmed.len());
        Some((start, start + token.len()))
    }

    /// Returns the next raw token, or `None` at the end of the input.
    fn next_raw(&mut self) -> Result<Option<String>, ScanError> {
        loop {
            if let Some((start, end)) = self.next_token_span() {
                self.pos = end;
                return Ok(Some(self.buf[start..end].to_owned()));
            }
            if !self.fill_line()? {
                return Ok(None);
            }
        }
    }

    /// Reads the next token and parses it into `T`.
    fn next<T>(&mut self) -> Result<T, ScanError>
    where
        T: FromStr,
    {
        let token = self.next_raw()?.ok_or(ScanError::UnexpectedEof)?;
        token.parse::<T>().map_err(|_| ScanError::Parse {
            token,
            type_name: std::any::type_name::<T>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_INSTANCE: &str = r#"
        3           # three rides
        0 10        # ride 0
        5 15
        10 20       # touches ride 0
    "#;

    #[test]
    fn test_loads_rides_in_order() {
        let model: Model<i64> = RideLoader::new()
            .from_str(SMALL_INSTANCE)
            .expect("Failed to load");
        assert_eq!(model.num_rides(), 3);
        assert_eq!(model.ride_durations(), &[10, 10, 10]);
        assert_eq!(model.stabbing_number(), 2);
    }

    #[test]
    fn test_reports_invalid_ride_position() {
        let res: Result<Model<i64>, _> = RideLoader::new().from_str("2\n0 10\n10 5\n");
        match res {
            Err(LoadError::Model(ModelError::InvalidRide { index, start, end })) => {
                assert_eq!((index, start, end), (1, 10, 5));
            }
            other => panic!("Expected InvalidRide, got {:?}", other.map(|m| m.num_rides())),
        }
    }

    #[test]
    fn test_unexpected_eof() {
        let res: Result<Model<i64>, _> = RideLoader::new().from_str("2\n0 10\n5");
        assert!(matches!(res, Err(LoadError::UnexpectedEof)));
    }

    #[test]
    fn test_parse_error_structure() {
        let res: Result<Model<i64>, _> = RideLoader::new().from_str("1 0 garbage");
        match res {
            Err(LoadError::Parse { token, type_name }) => {
                assert_eq!(token, "garbage");
                assert!(type_name.contains("i64"));
            }
            _ => panic!("Expected Parse error with context"),
        }
    }

    #[test]
    fn test_strict_mode_rejects_trailing_tokens() {
        let data = "1\n0 10\n99 # leftover";
        let lenient: Result<Model<i64>, _> = RideLoader::new().from_str(data);
        assert!(lenient.is_ok());

        let strict: Result<Model<i64>, _> = RideLoader::new().strict(true).from_str(data);
        assert!(matches!(strict, Err(LoadError::TrailingData(ref t)) if t == "99"));
    }

    #[test]
    fn test_rejects_zero_ride_count() {
        let res: Result<Model<i64>, _> = RideLoader::new().from_str("0");
        assert!(matches!(res, Err(LoadError::InvalidRideCount(ref t)) if t == "0"));
    }
}
