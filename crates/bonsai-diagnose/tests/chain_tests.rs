use std::cell::RefCell;
use std::time::Duration;

use bonsai_diagnose::diaglets::{
    ContainerRestarts, EpisodeLogsEnabled, Errors, LastNRecords, SdkVersion, SimTimeout,
    SysLogsEnabled,
};
use bonsai_diagnose::{
    Chain, ChainEvent, ContainerGroups, Context, DiagnoseConfig, Diaglet, Error, GroupRestarts,
    LogQuery, LogTable, QueryOutcome, ResultSink, Result, Stage,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Answers a query with the first table whose key appears in the KQL.
#[derive(Default)]
struct ScriptedLogs {
    answers: Vec<(&'static str, LogTable)>,
    fail_on: Option<&'static str>,
    queries: RefCell<Vec<String>>,
}

impl ScriptedLogs {
    fn answer(mut self, key: &'static str, table: LogTable) -> Self {
        self.answers.push((key, table));
        self
    }

    fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl LogQuery for ScriptedLogs {
    fn query(&self, kql: &str, _timespan: Duration) -> Result<QueryOutcome> {
        self.queries.borrow_mut().push(kql.to_string());
        if self.fail_on.is_some_and(|key| kql.contains(key)) {
            return Err(Error::Service {
                service: "Log Analytics",
                status: 500,
                message: "boom".to_string(),
            });
        }
        let table = self
            .answers
            .iter()
            .find(|(key, _)| kql.contains(key))
            .map(|(_, table)| table.clone())
            .unwrap_or_default();
        Ok(QueryOutcome {
            table,
            partial_error: None,
        })
    }
}

#[derive(Default)]
struct FakeGroups {
    groups: Vec<(&'static str, GroupRestarts)>,
}

impl ContainerGroups for FakeGroups {
    fn list_groups(&self, _resource_group: &str) -> Result<Vec<String>> {
        Ok(self.groups.iter().map(|(name, _)| name.to_string()).collect())
    }

    fn group_restarts(&self, _resource_group: &str, group: &str) -> Result<GroupRestarts> {
        Ok(self
            .groups
            .iter()
            .find(|(name, _)| *name == group)
            .map(|(_, r)| *r)
            .unwrap_or_default())
    }
}

fn config(root: &TempDir) -> DiagnoseConfig {
    DiagnoseConfig {
        brain_name: "CartPole".to_string(),
        brain_version: 3,
        concept_name: "Balance".to_string(),
        workspace_id: "ws-1".to_string(),
        subscription_id: "sub-1".to_string(),
        resource_group: "rg-1".to_string(),
        log_workspace_id: "law-1".to_string(),
        log_root: root.path().to_path_buf(),
        unique_name: "20240101000000000000".to_string(),
        container_group: "bv-1_c1".to_string(),
    }
}

fn rows(column: &str, values: &[&str]) -> LogTable {
    let mut table = LogTable::new([column]);
    for value in values {
        table.push_row(vec![json!(value)]);
    }
    table
}

fn messages(events: &[ChainEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ChainEvent::Finding { finding, .. } => Some(finding.message.clone()),
            _ => None,
        })
        .collect()
}

fn diaglet_names(events: &[ChainEvent]) -> Vec<&'static str> {
    events
        .iter()
        .filter_map(|e| match e {
            ChainEvent::Finding { diaglet, .. } => Some(*diaglet),
            _ => None,
        })
        .collect()
}

struct Harness {
    root: TempDir,
    config: DiagnoseConfig,
    sink: ResultSink,
}

impl Harness {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let config = config(&root);
        let sink = ResultSink::create(&config).unwrap();
        Self { root, config, sink }
    }

    fn context<'a>(&'a self, logs: &'a ScriptedLogs, groups: &'a FakeGroups) -> Context<'a> {
        Context {
            config: &self.config,
            logs,
            containers: groups,
            sink: &self.sink,
        }
    }

    fn saved(&self, file: &str) -> Value {
        let path = self.root.path().join(&self.config.unique_name).join(file);
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }
}

#[test]
fn standard_chain_runs_every_diaglet_when_logs_exist() {
    let h = Harness::new();
    let logs = ScriptedLogs::default()
        .answer("desc\n| limit 1", rows("Message", &["x"]))
        .answer("microsoft-bonsai-api", rows("Message", &["microsoft-bonsai-api version 0.1.4"]))
        .answer("EpisodeLog_CL", rows("EpisodeId_d", &["1"]));
    let groups = FakeGroups::default();

    let mut seen = Vec::new();
    let events = Chain::standard()
        .run(&h.context(&logs, &groups), |e| seen.push(e.clone()))
        .unwrap();

    assert_eq!(seen, events);
    assert_eq!(
        diaglet_names(&events),
        vec![
            "ContainerRestartsDiaglet",
            "SysLogsEnabledDiaglet",
            "SDKVersionDiaglet",
            "SimTimeoutDiaglet",
            "ErrorsDiaglet",
            "EpisodeLogsEnabledDiaglet",
            "IterationHaltedDiaglet",
        ]
    );
    assert!(!events.contains(&ChainEvent::SegmentStopped));
    assert_eq!(messages(&events)[2], "microsoft-bonsai-api version 0.1.4");
}

#[test]
fn missing_sim_logs_skip_only_the_simulator_segment() {
    let h = Harness::new();
    let logs = ScriptedLogs::default().answer("EpisodeLog_CL", rows("EpisodeId_d", &["1"]));
    let groups = FakeGroups::default();

    let events = Chain::standard().run(&h.context(&logs, &groups), |_| {}).unwrap();

    assert_eq!(
        diaglet_names(&events),
        vec![
            "ContainerRestartsDiaglet",
            "SysLogsEnabledDiaglet",
            "EpisodeLogsEnabledDiaglet",
            "IterationHaltedDiaglet",
        ]
    );
    assert_eq!(events[2], ChainEvent::SegmentStopped);
    assert!(messages(&events)[1].starts_with("There are no simulator logs."));
    assert_eq!(messages(&events)[3], "There are no halted iterations.");
}

struct Breaker;

impl Diaglet for Breaker {
    fn name(&self) -> &'static str {
        "BreakerDiaglet"
    }

    fn friendly_name(&self) -> &'static str {
        "Breaker"
    }

    fn diagnose(&self, _ctx: &Context<'_>) -> Result<bonsai_diagnose::Finding> {
        Ok(bonsai_diagnose::Finding::stop("stop here"))
    }
}

#[test]
fn breaking_single_stage_stops_the_chain() {
    let h = Harness::new();
    let logs = ScriptedLogs::default();
    let groups = FakeGroups::default();
    let chain = Chain::new(vec![
        Stage::Single(Box::new(Breaker)),
        Stage::Single(Box::new(SimTimeout)),
    ]);

    let events = chain.run(&h.context(&logs, &groups), |_| {}).unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[1], ChainEvent::ChainStopped);
    assert!(logs.queries().is_empty());
}

#[test]
fn diaglet_errors_abort_the_run() {
    let h = Harness::new();
    let logs = ScriptedLogs {
        fail_on: Some("Simulator timed out"),
        ..ScriptedLogs::default()
    }
    .answer("desc\n| limit 1", rows("Message", &["x"]));
    let groups = FakeGroups::default();

    let mut seen = 0;
    let err = Chain::standard()
        .run(&h.context(&logs, &groups), |_| seen += 1)
        .unwrap_err();

    assert!(matches!(err, Error::Service { status: 500, .. }));
    // restarts, logging check, sdk version
    assert_eq!(seen, 3);
}

#[test]
fn container_restarts_are_summed_over_matching_groups() {
    let h = Harness::new();
    let logs = ScriptedLogs::default();
    let groups = FakeGroups {
        groups: vec![
            ("bv-1_c1-0", GroupRestarts { restarts: 2, instances: 3 }),
            ("bv-1_c1-1", GroupRestarts { restarts: 0, instances: 2 }),
            ("bv-9_c9-0", GroupRestarts { restarts: 7, instances: 1 }),
        ],
    };

    let finding = ContainerRestarts.diagnose(&h.context(&logs, &groups)).unwrap();

    assert_eq!(
        finding.message.lines().next(),
        Some("There are 2 restarts across 5 simulator instances.")
    );
    assert!(!finding.break_chain);
    assert_eq!(
        h.saved("ContainerRestartsDiaglet_Balance.json"),
        json!({"columns": ["ContainerGroup", "Restarts"], "rows": [["bv-1_c1-0", 2]]})
    );
}

#[test]
fn container_restarts_without_restarts_or_groups() {
    let h = Harness::new();
    let logs = ScriptedLogs::default();

    let quiet = FakeGroups {
        groups: vec![("bv-1_c1-0", GroupRestarts { restarts: 0, instances: 4 })],
    };
    let finding = ContainerRestarts.diagnose(&h.context(&logs, &quiet)).unwrap();
    assert_eq!(finding.message, "There are 0 restarts across 4 simulator instances.");

    let none = FakeGroups::default();
    let finding = ContainerRestarts.diagnose(&h.context(&logs, &none)).unwrap();
    assert_eq!(finding.message, "There are no simulator restarts.");
}

#[test]
fn simulator_queries_filter_on_container_group() {
    let h = Harness::new();
    let logs = ScriptedLogs::default();
    let groups = FakeGroups::default();

    SysLogsEnabled.diagnose(&h.context(&logs, &groups)).unwrap();

    assert_eq!(
        logs.queries(),
        vec![
            "ContainerInstanceLog_CL\n| where ContainerGroup_s contains \"bv-1_c1\"\n| order by TimeGenerated desc\n| limit 1"
        ]
    );
}

#[test]
fn training_queries_use_lower_case_brain_name() {
    let h = Harness::new();
    let logs = ScriptedLogs::default();
    let groups = FakeGroups::default();

    let finding = EpisodeLogsEnabled.diagnose(&h.context(&logs, &groups)).unwrap();

    assert!(finding.break_chain);
    assert_eq!(
        logs.queries(),
        vec!["EpisodeLog_CL\n| where BrainName_s==\"cartpole\"\n| where BrainVersion_d==3\n| limit 1"]
    );
}

#[test]
fn errors_finding_points_at_saved_file() {
    let h = Harness::new();
    let mut table = LogTable::new(["TimeGenerated", "Message"]);
    table.push_row(vec![json!("t1"), json!("ValueError: bad action")]);
    table.push_row(vec![json!("t0"), json!("exception in step")]);
    let logs = ScriptedLogs::default().answer("Message contains \"error\"", table);
    let groups = FakeGroups::default();

    let finding = Errors.diagnose(&h.context(&logs, &groups)).unwrap();

    let path = h.sink.path_for("ErrorsDiaglet");
    assert!(path.exists());
    assert_eq!(
        finding.message,
        format!(
            "There are 2 errors or exceptions in the logs. See the log file in \"{}\" for details.",
            path.display()
        )
    );
    assert_eq!(h.saved("ErrorsDiaglet_Balance.json")["rows"][0][1], json!("ValueError: bad action"));
}

#[test]
fn sdk_version_needs_exactly_one_row() {
    let h = Harness::new();
    let logs = ScriptedLogs::default();
    let groups = FakeGroups::default();

    let finding = SdkVersion.diagnose(&h.context(&logs, &groups)).unwrap();
    assert_eq!(finding.message, "Could not determine SDK version.");
}

#[test]
fn last_records_are_saved() {
    let h = Harness::new();
    let logs = ScriptedLogs::default().answer("| limit 1000", rows("Message", &["a", "b"]));
    let groups = FakeGroups::default();

    let finding = LastNRecords.diagnose(&h.context(&logs, &groups)).unwrap();

    assert_eq!(finding.message, "Saved the last 2 records.");
    assert_eq!(h.saved("LastNRecordsDiaglet_Balance.json")["rows"], json!([["a"], ["b"]]));
}
