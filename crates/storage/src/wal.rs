// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL append-only event log.
//!
//! Grounded on `oj-storage::wal::Wal`: scan-on-open to find the tail and
//! detect corruption, atomic append, `.bak`-rotation of a damaged file.
//! Tasque has no daemon and no group-commit path — every `tsq` invocation
//! is a short synchronous command, so each `append` is fsynced immediately
//! rather than buffered for a background flush.

use crate::error::WalError;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use tsq_core::event::EventRecord;
use tsq_core::id::EventId;

/// Append-only JSONL event log, one [`EventRecord`] per line.
pub struct Wal {
    file: File,
    path: PathBuf,
    /// Highest event id written so far.
    tail: EventId,
}

impl Wal {
    /// Open or create the log at `path`, scanning the tail for the highest
    /// event id and rotating a corrupt tail out of the way.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).read(true).append(true).open(path)?;

        let (tail, corrupt_at) = Self::scan(&file)?;

        let tail = if let Some(offset) = corrupt_at {
            let valid = Self::read_valid_lines(&file, offset)?;
            drop(file);

            let bak_path = crate::snapshot::rotate_bak_path(path);
            warn!(
                path = %path.display(),
                bak = %bak_path.display(),
                valid_entries = valid.len(),
                "corrupt event log tail, rotating to .bak and keeping valid entries",
            );
            std::fs::rename(path, &bak_path)?;

            {
                let mut clean = File::create(path)?;
                for line in &valid {
                    clean.write_all(line.as_bytes())?;
                    clean.write_all(b"\n")?;
                }
                clean.sync_all()?;
            }

            file = OpenOptions::new().create(true).read(true).append(true).open(path)?;
            Self::scan(&file)?.0
        } else {
            tail
        };

        Ok(Self { file, path: path.to_owned(), tail })
    }

    /// Scan the whole file, returning the highest event id seen and, if the
    /// tail is corrupt, the byte offset at which parsing failed.
    fn scan(file: &File) -> Result<(EventId, Option<u64>), WalError> {
        let mut reader = BufReader::new(file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut tail = EventId(0);
        let mut offset = 0u64;
        let mut line = String::new();
        loop {
            line.clear();
            let n = match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Ok((tail, Some(offset)));
                }
                Err(e) => return Err(e.into()),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                offset += n as u64;
                continue;
            }

            match serde_json::from_str::<EventRecord>(trimmed) {
                Ok(record) => tail = tail.max(record.event_id),
                Err(_) => return Ok((tail, Some(offset))),
            }
            offset += n as u64;
        }

        Ok((tail, None))
    }

    fn read_valid_lines(file: &File, stop_at: u64) -> Result<Vec<String>, WalError> {
        let mut reader = BufReader::new(file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut lines = Vec::new();
        let mut offset = 0u64;
        let mut line = String::new();
        while offset < stop_at {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
            offset += n as u64;
        }
        Ok(lines)
    }

    /// Append one record, assigning it the next event id, and fsync before
    /// returning — every command-layer append must be durable before the
    /// command reports success.
    pub fn append(&mut self, mut record: EventRecord) -> Result<EventRecord, WalError> {
        self.tail = self.tail.next();
        record.event_id = self.tail;

        let mut bytes = serde_json::to_vec(&record)?;
        bytes.push(b'\n');
        self.file.write_all(&bytes)?;
        self.file.sync_all()?;
        Ok(record)
    }

    /// Append a batch of records as a single fsynced unit (used by
    /// multi-event commands like `supersede`/`duplicate`/`merge`, which must
    /// commit atomically).
    pub fn append_batch(
        &mut self,
        mut records: Vec<EventRecord>,
    ) -> Result<Vec<EventRecord>, WalError> {
        let mut bytes = Vec::new();
        for record in &mut records {
            self.tail = self.tail.next();
            record.event_id = self.tail;
            serde_json::to_writer(&mut bytes, record)?;
            bytes.push(b'\n');
        }
        self.file.write_all(&bytes)?;
        self.file.sync_all()?;
        Ok(records)
    }

    /// Read every record in the log, in append order. Any line that fails to
    /// parse — a half-written trailing line from a racing writer, or a
    /// corrupt line anywhere else in the file — is warned about and skipped;
    /// every other valid line, before or after it, is still returned.
    pub fn read_all(&self) -> Result<Vec<EventRecord>, WalError> {
        let mut reader = BufReader::new(self.file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut records = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::InvalidData => break,
                Err(e) => return Err(e.into()),
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(error = %e, "skipping unparseable log line");
                    continue;
                }
            }
        }
        Ok(records)
    }

    /// Read only records after `after` (exclusive), for replay on top of a
    /// snapshot.
    pub fn read_after(&self, after: EventId) -> Result<Vec<EventRecord>, WalError> {
        Ok(self.read_all()?.into_iter().filter(|r| r.event_id > after).collect())
    }

    pub fn tail(&self) -> EventId {
        self.tail
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
