use crate::annotation::{Annotation, Category};
use crate::error::{BuildWarning, CoordinateField, MalformedRecordError, RecordRef};
use crate::label::{bot_label, poi_label};
use crate::model::{Bot, Coordinate, validated};
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, warn};

/// What to do when a record has unusable coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip the record, collect its error and keep going
    #[default]
    BestEffort,
    /// Stop at the first malformed record
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "best-effort" => Ok(FailurePolicy::BestEffort),
            "fail-fast" => Ok(FailurePolicy::FailFast),
            other => Err(format!("Unknown failure policy: {other}")),
        }
    }
}

/// Result of a build: annotations plus everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub annotations: Vec<Annotation>,
    pub errors: Vec<MalformedRecordError>,
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    pub fn count(&self, category: Category) -> usize {
        self.annotations
            .iter()
            .filter(|a| a.category == category)
            .count()
    }
}

/// Turns bots and their POIs into map annotations.
///
/// Output order is each bot followed by its POIs, all in input order. The
/// builder holds no state besides its policy, so one instance can be shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationBuilder {
    policy: FailurePolicy,
}

impl AnnotationBuilder {
    pub const fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn build(&self, bots: &[Bot]) -> Result<BuildReport, MalformedRecordError> {
        let mut report = BuildReport::default();

        for (bot_index, bot) in bots.iter().enumerate() {
            let record = RecordRef::Bot { bot: bot_index };
            let (latitude, longitude) =
                match Self::coordinates(record, bot.latitude.as_ref(), bot.longitude.as_ref()) {
                    Ok(position) => position,
                    Err(err) => {
                        // Its POIs have no marker to belong to, so they go too
                        self.reject(&mut report, err)?;
                        continue;
                    }
                };
            debug!(bot = bot_index, name = %bot.name, "bot annotation");
            report.annotations.push(Annotation {
                latitude,
                longitude,
                category: Category::Bot,
                label: bot_label(&bot.name, latitude, longitude),
            });

            for (poi_index, poi) in bot.pois().iter().enumerate() {
                let record = RecordRef::Poi {
                    bot: bot_index,
                    poi: poi_index,
                };
                match Self::coordinates(record, poi.latitude.as_ref(), poi.longitude.as_ref()) {
                    Ok((latitude, longitude)) => {
                        report.annotations.push(Annotation {
                            latitude,
                            longitude,
                            category: Category::Poi,
                            label: poi_label(&poi.tags, latitude, longitude),
                        });
                    }
                    Err(err) => self.reject(&mut report, err)?,
                }
            }
        }

        if report.annotations.is_empty() {
            warn!(bots = bots.len(), "dataset produced no annotations");
            report.warnings.push(BuildWarning::EmptyDataset);
        }
        Ok(report)
    }

    fn reject(
        &self,
        report: &mut BuildReport,
        err: MalformedRecordError,
    ) -> Result<(), MalformedRecordError> {
        match self.policy {
            FailurePolicy::FailFast => Err(err),
            FailurePolicy::BestEffort => {
                warn!("skipping {err}");
                report.errors.push(err);
                Ok(())
            }
        }
    }

    fn coordinates(
        record: RecordRef,
        latitude: Option<&Coordinate>,
        longitude: Option<&Coordinate>,
    ) -> Result<(f64, f64), MalformedRecordError> {
        let latitude = Self::coordinate(record, CoordinateField::Latitude, latitude)?;
        let longitude = Self::coordinate(record, CoordinateField::Longitude, longitude)?;
        Ok((latitude, longitude))
    }

    fn coordinate(
        record: RecordRef,
        field: CoordinateField,
        value: Option<&Coordinate>,
    ) -> Result<f64, MalformedRecordError> {
        validated(value, field).map_err(|reason| MalformedRecordError {
            record,
            field,
            reason,
        })
    }
}
