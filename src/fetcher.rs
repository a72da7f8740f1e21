use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::osm::EntitySource;
use crate::settings::FetchSettings;
use crate::types::EntityRef;
use crate::xml::{canonicalize, extract_dependencies};

/// How a record on disk came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOrigin {
    /// A successful response, canonicalized.
    Canonical,
    /// The body of an error response, canonicalized when it was XML and
    /// written verbatim otherwise.
    ErrorBody { status: u16 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRecord {
    pub entity: EntityRef,
    pub path: PathBuf,
    pub origin: RecordOrigin,
}

/// Summary of one closure fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Entities fetched, in visiting order.
    pub records: Vec<StoredRecord>,
    /// References that pointed at an entity already visited in this run.
    pub duplicates_skipped: usize,
}

impl FetchReport {
    pub fn visited(&self) -> Vec<EntityRef> {
        self.records.iter().map(|record| record.entity).collect()
    }

    pub fn error_responses(&self) -> impl Iterator<Item = &StoredRecord> {
        self.records
            .iter()
            .filter(|record| matches!(record.origin, RecordOrigin::ErrorBody { .. }))
    }
}

/// Fetches an entity and, depth first, everything it references, writing one
/// canonical record per entity into `output_dir`.
pub struct ClosureFetcher<S> {
    source: S,
    output_dir: PathBuf,
    follow_members: bool,
    reject_error_status: bool,
}

impl<S: EntitySource> ClosureFetcher<S> {
    pub fn new(source: S, output_dir: impl Into<PathBuf>) -> Self {
        ClosureFetcher {
            source,
            output_dir: output_dir.into(),
            follow_members: false,
            reject_error_status: false,
        }
    }

    pub fn from_settings(source: S, settings: &FetchSettings) -> Self {
        ClosureFetcher::new(source, settings.output_dir.clone())
            .follow_members(settings.follow_members)
            .reject_error_status(settings.reject_error_status)
    }

    pub fn follow_members(mut self, follow_members: bool) -> Self {
        self.follow_members = follow_members;
        self
    }

    pub fn reject_error_status(mut self, reject_error_status: bool) -> Self {
        self.reject_error_status = reject_error_status;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn record_path(&self, entity: &EntityRef) -> PathBuf {
        self.output_dir.join(entity.file_name())
    }

    /// Walks the dependency closure of `root`. Each entity is fetched at most
    /// once per call, so shared and cyclic references terminate. The first
    /// error aborts the walk; records written before it stay on disk.
    pub fn fetch(&self, root: EntityRef, recursive: bool) -> Result<FetchReport, FetchError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| FetchError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut report = FetchReport::default();
        let mut visited = HashSet::new();
        let mut pending = vec![root];

        while let Some(entity) = pending.pop() {
            if !visited.insert(entity) {
                debug!(%entity, "already fetched in this run");
                report.duplicates_skipped += 1;
                continue;
            }

            let record = self.fetch_one(&entity)?;
            if recursive && record.origin == RecordOrigin::Canonical {
                let dependencies = self.dependencies_of(&record)?;
                // Reversed so the first dependency is popped first.
                pending.extend(dependencies.into_iter().rev());
            }
            report.records.push(record);
        }

        info!(
            %root,
            records = report.records.len(),
            duplicates = report.duplicates_skipped,
            "closure fetched"
        );
        Ok(report)
    }

    /// Fetches a single entity and writes its record, overwriting any
    /// existing file.
    pub fn fetch_one(&self, entity: &EntityRef) -> Result<StoredRecord, FetchError> {
        let response = self.source.fetch_raw(entity)?;
        let path = self.record_path(entity);

        if !response.is_success() {
            if self.reject_error_status {
                return Err(FetchError::Status {
                    entity: *entity,
                    status: response.status,
                });
            }
            warn!(
                %entity,
                status = response.status,
                "remote service returned an error, storing its body"
            );
            let contents = canonicalize(&response.body).unwrap_or(response.body);
            write_record(&path, &contents)?;
            return Ok(StoredRecord {
                entity: *entity,
                path,
                origin: RecordOrigin::ErrorBody {
                    status: response.status,
                },
            });
        }

        let canonical = canonicalize(&response.body).map_err(|source| FetchError::Xml {
            entity: *entity,
            source,
        })?;
        write_record(&path, &canonical)?;
        info!(%entity, path = %path.display(), "record written");

        Ok(StoredRecord {
            entity: *entity,
            path,
            origin: RecordOrigin::Canonical,
        })
    }

    /// Reads a written record back and lists the entities it references.
    fn dependencies_of(&self, record: &StoredRecord) -> Result<Vec<EntityRef>, FetchError> {
        let text = fs::read_to_string(&record.path).map_err(|source| FetchError::Io {
            path: record.path.clone(),
            source,
        })?;
        let parsed =
            extract_dependencies(&text, self.follow_members).map_err(|source| FetchError::Xml {
                entity: record.entity,
                source,
            })?;

        if parsed.entity != record.entity {
            warn!(
                requested = %record.entity,
                received = %parsed.entity,
                "record describes a different entity"
            );
        }
        debug!(
            entity = %record.entity,
            count = parsed.dependencies.len(),
            "dependencies found"
        );
        Ok(parsed.dependencies)
    }
}

fn write_record(path: &Path, contents: &str) -> Result<(), FetchError> {
    fs::write(path, contents).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })
}
