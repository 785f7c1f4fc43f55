#![forbid(unsafe_code)]
use rotamatch::{
    AssignOptions, CostMatrix, JobId, MatchingError, MatchingSolver, PreferenceRecord, Roster,
    SchedError, Scheduler, ShortfallPolicy, WorkerId,
};

fn roster(workers: &[&str], jobs: &[&str]) -> Roster {
    Roster {
        workers: workers.iter().map(WorkerId::new).collect(),
        jobs: jobs.iter().map(JobId::new).collect(),
        preferences: Vec::new(),
    }
}

fn prefs(name: &str, first: Option<&str>, avoid: Option<&str>) -> PreferenceRecord {
    let mut r = PreferenceRecord::neutral(WorkerId::new(name));
    r.first = first.map(JobId::new);
    r.avoid = avoid.map(JobId::new);
    r
}

fn names(cells: Vec<Option<&WorkerId>>) -> Vec<&str> {
    let mut out: Vec<&str> = cells.into_iter().flatten().map(WorkerId::as_str).collect();
    out.sort_unstable();
    out
}

fn cell<'a>(outcome: &'a rotamatch::Outcome, job: &str, period: usize) -> Option<&'a str> {
    outcome.schedule.get(&JobId::new(job)).unwrap()[period]
        .as_ref()
        .map(WorkerId::as_str)
}

#[test]
fn first_choice_of_senior_worker_wins() {
    let mut r = roster(&["Alice", "Bob"], &["Cashier", "Stock"]);
    r.preferences = vec![prefs("Alice", Some("Cashier"), None)];

    let outcome = Scheduler::new(r).assign(1).unwrap();
    assert_eq!(cell(&outcome, "Cashier", 0), Some("Alice"));
    assert_eq!(cell(&outcome, "Stock", 0), Some("Bob"));
    assert!(outcome.mismatches.is_empty());
}

#[test]
fn junior_preference_is_honoured_when_senior_is_indifferent() {
    let mut r = roster(&["Alice", "Bob"], &["Cashier", "Stock"]);
    r.preferences = vec![prefs("Bob", Some("Cashier"), None)];

    let outcome = Scheduler::new(r).assign(1).unwrap();
    assert_eq!(cell(&outcome, "Cashier", 0), Some("Bob"));
    assert_eq!(cell(&outcome, "Stock", 0), Some("Alice"));
}

#[test]
fn avoided_job_is_left_to_someone_else() {
    let mut r = roster(&["Alice", "Bob"], &["Cashier", "Stock"]);
    r.preferences = vec![prefs("Alice", None, Some("Cashier"))];

    let outcome = Scheduler::new(r).assign(1).unwrap();
    assert_eq!(cell(&outcome, "Cashier", 0), Some("Bob"));
    assert_eq!(cell(&outcome, "Stock", 0), Some("Alice"));
}

#[test]
fn single_job_rotates_in_precedence_order() {
    let r = roster(&["Alice", "Bob", "Carol"], &["Door"]);
    let outcome = Scheduler::new(r).assign(3).unwrap();

    let door: Vec<&str> = outcome
        .schedule
        .get(&JobId::new("Door"))
        .unwrap()
        .iter()
        .map(|c| c.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(door, ["Alice", "Bob", "Carol"]);
    assert!(outcome.entitlement.entries().iter().all(|e| e.slots == 1));
}

#[test]
fn forced_worker_is_scheduled_before_falling_behind() {
    // 6 créneaux pour 3 personnes : 2 chacun. Après la période 1 (alice, bob),
    // carol doit travailler les deux périodes restantes.
    let r = roster(&["alice", "bob", "carol"], &["a", "b"]);
    let outcome = Scheduler::new(r).assign(3).unwrap();

    assert_eq!(names(outcome.schedule.period(0)), ["alice", "bob"]);
    assert_eq!(names(outcome.schedule.period(1)), ["alice", "carol"]);
    assert_eq!(names(outcome.schedule.period(2)), ["bob", "carol"]);
    assert!(outcome.mismatches.is_empty());
}

#[test]
fn every_slot_is_filled_and_entitlements_hold() {
    let mut r = roster(
        &["ann", "ben", "cat", "dan", "eve", "fay", "gus"],
        &["till", "stock", "floor"],
    );
    r.preferences = vec![
        prefs("ann", Some("till"), Some("floor")),
        prefs("cat", Some("till"), None),
        prefs("eve", Some("floor"), Some("till")),
        prefs("gus", None, Some("stock")),
    ];
    let periods = 5;
    let outcome = Scheduler::new(r).assign(periods).unwrap();

    assert_eq!(outcome.entitlement.total(), periods * 3);
    assert_eq!(outcome.schedule.filled_slots(), periods * 3);
    for (_, row) in outcome.schedule.rows() {
        assert_eq!(row.len(), periods);
    }
    for p in 0..periods {
        let mut who = names(outcome.schedule.period(p));
        let n = who.len();
        who.dedup();
        assert_eq!(who.len(), n, "a worker holds two jobs in period {p}");
    }
    assert!(outcome.mismatches.is_empty());
}

#[test]
fn runs_are_deterministic() {
    let mut r = roster(&["a", "b", "c", "d", "e"], &["x", "y"]);
    r.preferences = vec![prefs("b", Some("y"), None), prefs("d", Some("x"), Some("y"))];
    let first = Scheduler::new(r.clone()).assign(4).unwrap();
    let second = Scheduler::new(r).assign(4).unwrap();
    assert_eq!(first.schedule, second.schedule);
}

#[test]
fn zero_periods_is_empty_input() {
    let err = Scheduler::new(roster(&["a"], &["x"])).assign(0).unwrap_err();
    assert!(matches!(err, SchedError::EmptyInput(_)));
}

#[test]
fn missing_workers_or_jobs_is_empty_input() {
    let err = Scheduler::new(roster(&[], &["x"])).assign(1).unwrap_err();
    assert!(matches!(err, SchedError::EmptyInput(_)));
    let err = Scheduler::new(roster(&["a"], &[])).assign(1).unwrap_err();
    assert!(matches!(err, SchedError::EmptyInput(_)));
}

#[test]
fn unknown_worker_aborts_before_scheduling() {
    let mut r = roster(&["a", "b"], &["x"]);
    r.preferences = vec![prefs("zed", Some("x"), None)];
    let err = Scheduler::new(r).assign(2).unwrap_err();
    assert!(matches!(err, SchedError::UnknownWorker(name) if name == "zed"));
}

#[test]
fn fewer_workers_than_jobs_fails_by_default() {
    let err = Scheduler::new(roster(&["a"], &["x", "y"]))
        .assign(2)
        .unwrap_err();
    assert!(matches!(
        err,
        SchedError::UnderSubscription {
            period: 1,
            eligible: 1,
            jobs: 2
        }
    ));
}

#[test]
fn partial_policy_leaves_cells_empty_and_reports_shortfall() {
    let opts = AssignOptions {
        shortfall: ShortfallPolicy::Partial,
        ..AssignOptions::default()
    };
    let outcome = Scheduler::new(roster(&["a"], &["x", "y"]))
        .with_options(opts)
        .assign(2)
        .unwrap();

    assert_eq!(outcome.schedule.periods(), 2);
    assert_eq!(outcome.schedule.filled_slots(), 2);
    assert_eq!(outcome.mismatches.len(), 1);
    assert_eq!(outcome.mismatches[0].expected, 4);
    assert_eq!(outcome.mismatches[0].actual, 2);
}

#[test]
fn extra_workers_only_fill_the_jobs_that_exist() {
    let outcome = Scheduler::new(roster(&["a", "b", "c", "d"], &["x", "y"]))
        .assign(1)
        .unwrap();
    assert_eq!(names(outcome.schedule.period(0)), ["a", "b"]);
    let idle: Vec<usize> = outcome.entitlement.entries()[2..].iter().map(|e| e.slots).collect();
    assert_eq!(idle, [0, 0]);
}

struct BrokenSolver;

impl MatchingSolver for BrokenSolver {
    fn solve(&self, _costs: &CostMatrix) -> Result<Vec<(usize, usize)>, MatchingError> {
        Ok(vec![(0, 0), (0, 0)])
    }
}

#[test]
fn malformed_solver_output_is_fatal() {
    let err = Scheduler::with_solver(roster(&["a", "b"], &["x", "y"]), BrokenSolver)
        .assign(1)
        .unwrap_err();
    assert!(matches!(err, SchedError::Solver(MatchingError::InvalidAssignment(_))));
}

#[test]
fn invalid_weights_are_rejected() {
    let mut opts = AssignOptions::default();
    opts.weights.avoid = -10.0;
    let err = Scheduler::new(roster(&["a"], &["x"]))
        .with_options(opts)
        .assign(1)
        .unwrap_err();
    assert!(matches!(err, SchedError::InvalidWeights(_)));
}

#[test]
fn check_flags_a_hand_edited_grid() {
    let scheduler = Scheduler::new(roster(&["alice", "bob"], &["x"]));
    let mut outcome = scheduler.assign(2).unwrap();
    assert!(scheduler.check(&outcome.schedule).unwrap().is_empty());

    let mut grid = rotamatch::Schedule::new(vec![JobId::new("x")]);
    grid.push_period(vec![Some(WorkerId::new("alice"))]);
    grid.push_period(vec![Some(WorkerId::new("alice"))]);
    outcome.schedule = grid;

    let mismatches = scheduler.check(&outcome.schedule).unwrap();
    assert_eq!(mismatches.len(), 2);
    assert_eq!(mismatches[0].worker.as_str(), "alice");
    assert_eq!((mismatches[0].expected, mismatches[0].actual), (1, 2));
    assert_eq!((mismatches[1].expected, mismatches[1].actual), (1, 0));
}
