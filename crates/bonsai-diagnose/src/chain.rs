//! Ordered execution of diaglets
//!
//! A chain is a list of stages. A [`Stage::Single`] diaglet that breaks
//! stops the whole chain; a diaglet inside a [`Stage::Segment`] that breaks
//! only skips the rest of its segment.

use crate::Result;
use crate::diaglets::{
    ContainerRestarts, Context, Diaglet, EpisodeLogsEnabled, Errors, Finding, IterationHalted,
    SdkVersion, SimTimeout, SysLogsEnabled,
};

pub enum Stage {
    Single(Box<dyn Diaglet>),
    Segment(Vec<Box<dyn Diaglet>>),
}

/// Progress reported while a chain runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    Finding {
        diaglet: &'static str,
        friendly_name: &'static str,
        finding: Finding,
    },
    /// A single stage broke; nothing further runs
    ChainStopped,
    /// A segment member broke; the next stage still runs
    SegmentStopped,
}

pub struct Chain {
    stages: Vec<Stage>,
}

impl Chain {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Container restarts, then simulator logs, then training logs.
    pub fn standard() -> Self {
        Self::new(vec![
            Stage::Single(Box::new(ContainerRestarts)),
            Stage::Segment(vec![
                Box::new(SysLogsEnabled),
                Box::new(SdkVersion),
                Box::new(SimTimeout),
                Box::new(Errors),
            ]),
            Stage::Segment(vec![Box::new(EpisodeLogsEnabled), Box::new(IterationHalted)]),
        ])
    }

    /// Run every stage in order, passing each event to `on_event` as it
    /// happens. The first diaglet error aborts the run.
    pub fn run<F>(&self, ctx: &Context<'_>, mut on_event: F) -> Result<Vec<ChainEvent>>
    where
        F: FnMut(&ChainEvent),
    {
        let mut events = Vec::new();
        let mut emit = |event: ChainEvent| {
            on_event(&event);
            events.push(event);
        };

        'stages: for stage in &self.stages {
            match stage {
                Stage::Single(diaglet) => {
                    let finding = run_one(diaglet.as_ref(), ctx)?;
                    let stop = finding.break_chain;
                    emit(finding_event(diaglet.as_ref(), finding));
                    if stop {
                        emit(ChainEvent::ChainStopped);
                        break 'stages;
                    }
                }
                Stage::Segment(diaglets) => {
                    for diaglet in diaglets {
                        let finding = run_one(diaglet.as_ref(), ctx)?;
                        let stop = finding.break_chain;
                        emit(finding_event(diaglet.as_ref(), finding));
                        if stop {
                            emit(ChainEvent::SegmentStopped);
                            break;
                        }
                    }
                }
            }
        }

        Ok(events)
    }
}

fn run_one(diaglet: &dyn Diaglet, ctx: &Context<'_>) -> Result<Finding> {
    tracing::info!(diaglet = diaglet.name(), "running diaglet");
    let finding = diaglet.diagnose(ctx)?;
    tracing::debug!(diaglet = diaglet.name(), break_chain = finding.break_chain, "diaglet finished");
    Ok(finding)
}

fn finding_event(diaglet: &dyn Diaglet, finding: Finding) -> ChainEvent {
    ChainEvent::Finding {
        diaglet: diaglet.name(),
        friendly_name: diaglet.friendly_name(),
        finding,
    }
}
