use std::{io::BufReader, path::PathBuf, process::exit, str::FromStr};

use otter_qbf::{
    config::{
        Config, ConfigOption, DecisionHeuristicKind, DependencyStrategy, ModelGenerationKind,
        PhaseHeuristicKind, RestartStrategy, VsidsTiebreak,
    },
    context::Solver,
    reports::Report,
    structures::constraint::ConstraintKind,
    types::err::ErrorKind,
};

const USAGE: &str = r#"Usage: otter_qbf [options] [<path>]

Reads a QDIMACS or QCIR-14 formula from <path> (xz-compressed accepted) or standard
input, and reports SAT, UNSAT, or UNDEF. Exit code: 10 SAT, 20 UNSAT, 0 UNDEF.

General Options:
  --initial-clause-DB-size=<int>        initial learnt clause DB size [default: 4000]
  --initial-term-DB-size=<int>          initial learnt term DB size [default: 500]
  --clause-DB-increment=<int>           clause database size increment [default: 4000]
  --term-DB-increment=<int>             term database size increment [default: 500]
  --clause-removal-ratio=<double>       fraction of clauses removed while cleaning [default: 0.5]
  --term-removal-ratio=<double>         fraction of terms removed while cleaning [default: 0.5]
  --use-activity-threshold              remove all constraints with activities below threshold
  --LBD-threshold=<int>                 only remove constraints with LBD larger than this [default: 2]
  --constraint-activity-inc=<double>    constraint activity increment [default: 1]
  --constraint-activity-decay=<double>  constraint activity decay [default: 0.999]
  --decision-heuristic=<arg>            variable decision heuristic [default: VMTF]
                                        (VSIDS | VMTF | VMTF_ORD | SGDB | SPLIT_VMTF | SPLIT_VSIDS | CQB | EMAB)
  --restarts=<arg>                      restart strategy [default: inner-outer]
                                        (off | luby | inner-outer | EMA)
  --model-generation=<arg>              model generation strategy for initial terms [default: depqbf]
                                        (off | depqbf | weighted)
  --dependency-learning=<arg>           dependency learning strategy [default: all]
                                        (off | outermost | fewest | all)
  --no-phase-saving                     deactivate phase saving
  --phase-heuristic=<arg>               phase selection heuristic [default: watcher]
                                        (invJW | qtype | watcher | random | false | true)
  --partial-certificate                 output assignment to outermost block
  -v --verbose                          output information during solver run
  --print-stats                         print statistics on termination

Weighted Model Generation Options:
  --exponent=<double>                   exponent skewing the distribution of weights [default: 1]
  --scaling-factor=<double>             scaling factor for variable weights [default: 1]
  --universal-penalty=<double>          additive penalty for universal variables [default: 0]

VSIDS Options:
  --tiebreak=<arg>                      tiebreaking strategy for equally active variables [default: arbitrary]
                                        (arbitrary | more-primary | fewer-primary | more-secondary | fewer-secondary)
  --var-activity-inc=<double>           variable activity increment [default: 1]
  --var-activity-decay=<double>         variable activity decay [default: 0.95]
  --bump-conflict-side                  additionally bump conflict-side literals

SGDB Options:
  --initial-learning-rate=<double>      initial learning rate [default: 0.8]
  --learning-rate-decay=<double>        learning rate additive decay [default: 2e-6]
  --learning-rate-minimum=<double>      minimum learning rate [default: 0.12]
  --lambda-factor=<double>              regularization parameter [default: 0.1]

Split Heuristic Options:
  --mode-cycles=<int>                   restarts after which a mode switch happens [default: 1]
  --split-phase-saving                  keep saved phases for the decision modes separately
  --start-univ-mode                     start in universal mode instead of existential mode

Split VMTF Options:
  --always-move                         move variables for every learnt constraint
  --move-by-prefix                      move variables sorted by their quantifier depth

Split VSIDS Options:
  --always-bump                         bump variable scores for every learnt constraint

Luby Restart Options:
  --luby-restart-multiplier=<int>       multiplier for restart intervals [default: 50]

EMA Restart Options:
  --alpha=<double>                      weight of new constraint LBD [default: 2e-5]
  --minimum-distance=<int>              minimum restart distance [default: 20]
  --threshold-factor=<double>           restart if short term LBD is this much larger than long term [default: 1.4]

Outer-Inner Restart Options:
  --inner-restart-distance=<int>        initial number of conflicts until inner restart [default: 100]
  --outer-restart-distance=<int>        initial number of conflicts until outer restart [default: 100]
  --restart-multiplier=<double>         restart limit multiplier [default: 1.1]
"#;

#[derive(Default)]
struct CliOptions {
    path: Option<PathBuf>,
    verbose: bool,
    print_stats: bool,
    partial_certificate: bool,
}

/// Reports an argument problem with the usage block.
/// Exit code 0, as the run produced no verdict.
fn argument_error(message: &str) -> ! {
    println!("{message}\n\n{USAGE}");
    exit(0)
}

/// Parses `--name=value` against a numeric or boolean option, respecting its range.
fn set_option<T: FromStr + PartialOrd + Copy + std::fmt::Display>(
    option: &mut ConfigOption<T>,
    value: Option<&str>,
) {
    let parsed = value.and_then(|v| v.parse::<T>().ok());
    match parsed {
        Some(value) if option.set(value) => {}
        _ => {
            let (min, max) = option.min_max();
            argument_error(&format!(
                "--{} requires a value between {min} and {max}",
                option.name
            ));
        }
    }
}

/// Parses `--name=value` against a strategy selection.
fn set_strategy<T: FromStr>(name: &str, target: &mut T, value: Option<&str>) {
    match value.and_then(|v| v.parse::<T>().ok()) {
        Some(strategy) => *target = strategy,
        None => argument_error(&format!("--{name} was given an unrecognised value")),
    }
}

fn parse_args(args: &[String], config: &mut Config, cli: &mut CliOptions) {
    for arg in args.iter().skip(1) {
        if !arg.starts_with('-') {
            if cli.path.is_some() {
                argument_error("at most one input path may be given");
            }
            cli.path = Some(PathBuf::from(arg));
            continue;
        }

        let mut split = arg.splitn(2, '=');
        let name = split.next().unwrap_or_default();
        let value = split.next();

        match name {
            "-v" | "--verbose" => cli.verbose = true,
            "--print-stats" => cli.print_stats = true,
            "--partial-certificate" => cli.partial_certificate = true,

            "--use-activity-threshold" => config.constraint_db.use_activity_threshold.value = true,
            "--no-phase-saving" => config.heuristic.phase_saving = false,
            "--bump-conflict-side" => config.heuristic.bump_conflict_side.value = true,
            "--split-phase-saving" => config.heuristic.split_phase_saving.value = true,
            "--start-univ-mode" => config.heuristic.start_univ_mode.value = true,
            "--always-move" => config.heuristic.always_move.value = true,
            "--move-by-prefix" => config.heuristic.move_by_prefix.value = true,
            "--always-bump" => config.heuristic.always_bump.value = true,

            "--initial-clause-DB-size" => {
                set_option(&mut config.constraint_db.initial_clause_limit, value)
            }
            "--initial-term-DB-size" => {
                set_option(&mut config.constraint_db.initial_term_limit, value)
            }
            "--clause-DB-increment" => {
                set_option(&mut config.constraint_db.clause_increment, value)
            }
            "--term-DB-increment" => set_option(&mut config.constraint_db.term_increment, value),
            "--clause-removal-ratio" => {
                set_option(&mut config.constraint_db.clause_removal_ratio, value)
            }
            "--term-removal-ratio" => {
                set_option(&mut config.constraint_db.term_removal_ratio, value)
            }
            "--LBD-threshold" => set_option(&mut config.constraint_db.lbd_bound, value),
            "--constraint-activity-inc" => set_option(&mut config.constraint_db.bump, value),
            "--constraint-activity-decay" => set_option(&mut config.constraint_db.decay, value),

            "--decision-heuristic" => {
                set_strategy::<DecisionHeuristicKind>(
                    "decision-heuristic",
                    &mut config.heuristic.decision,
                    value,
                );
            }
            "--restarts" => {
                set_strategy::<RestartStrategy>("restarts", &mut config.restarts.strategy, value)
            }
            "--model-generation" => set_strategy::<ModelGenerationKind>(
                "model-generation",
                &mut config.model_generation.strategy,
                value,
            ),
            "--dependency-learning" => set_strategy::<DependencyStrategy>(
                "dependency-learning",
                &mut config.dependencies.strategy,
                value,
            ),
            "--phase-heuristic" => set_strategy::<PhaseHeuristicKind>(
                "phase-heuristic",
                &mut config.heuristic.phase,
                value,
            ),
            "--tiebreak" => {
                set_strategy::<VsidsTiebreak>("tiebreak", &mut config.heuristic.tiebreak, value)
            }

            "--exponent" => set_option(&mut config.model_generation.exponent, value),
            "--scaling-factor" => set_option(&mut config.model_generation.scaling_factor, value),
            "--universal-penalty" => {
                set_option(&mut config.model_generation.universal_penalty, value)
            }

            "--var-activity-inc" => set_option(&mut config.heuristic.score_increment, value),
            "--var-activity-decay" => set_option(&mut config.heuristic.score_decay, value),

            "--initial-learning-rate" => {
                set_option(&mut config.heuristic.initial_learning_rate, value)
            }
            "--learning-rate-decay" => set_option(&mut config.heuristic.learning_rate_decay, value),
            "--learning-rate-minimum" => {
                set_option(&mut config.heuristic.learning_rate_minimum, value)
            }
            "--lambda-factor" => set_option(&mut config.heuristic.lambda_factor, value),

            "--mode-cycles" => set_option(&mut config.heuristic.mode_cycles, value),

            "--luby-restart-multiplier" => set_option(&mut config.restarts.luby_multiplier, value),
            "--alpha" => set_option(&mut config.restarts.alpha, value),
            "--minimum-distance" => set_option(&mut config.restarts.minimum_distance, value),
            "--threshold-factor" => set_option(&mut config.restarts.threshold_factor, value),
            "--inner-restart-distance" => {
                set_option(&mut config.restarts.inner_restart_distance, value)
            }
            "--outer-restart-distance" => {
                set_option(&mut config.restarts.outer_restart_distance, value)
            }
            "--restart-multiplier" => set_option(&mut config.restarts.restart_multiplier, value),

            _ => argument_error(&format!("unable to parse argument: {arg}")),
        }
    }
}

fn print_stats(solver: &Solver) {
    let counters = &solver.counters;
    println!("c conflicts: {}", counters.conflicts);
    println!("c decisions: {}", counters.decisions);
    println!("c propagations: {}", counters.propagations);
    println!("c restarts: {}", counters.restarts);
    println!("c learnt clauses: {}", counters.learnt_clauses);
    println!("c learnt terms: {}", counters.learnt_terms);
    println!("c initial terms: {}", counters.initial_terms);
    println!("c learnt dependencies: {}", solver.dependencies.recorded_count());
    println!("c trail resets: {}", solver.counters.trail_resets);
    println!(
        "c clause cleanings: {}",
        solver.constraints.cleaning_count(ConstraintKind::Clause)
    );
    println!(
        "c term cleanings: {}",
        solver.constraints.cleaning_count(ConstraintKind::Term)
    );
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut config = Config::default();
    let mut cli = CliOptions::default();
    parse_args(&args, &mut config, &mut cli);

    if let Err(message) = config.validate() {
        argument_error(message);
    }

    let mut builder = env_logger::Builder::from_default_env();
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    let _ = builder.try_init();

    let mut solver = Solver::from_config(config);

    let read_result = match &cli.path {
        None => solver.read_auto(BufReader::new(std::io::stdin())),
        Some(path) => {
            let file = match std::fs::File::open(path) {
                Ok(file) => file,
                Err(_) => {
                    eprintln!(
                        "otter_qbf: cannot access '{}': no such file or directory",
                        path.display()
                    );
                    exit(2);
                }
            };
            match path.extension() {
                Some(extension) if extension == "xz" => {
                    solver.read_auto(BufReader::new(xz2::read::XzDecoder::new(file)))
                }
                _ => solver.read_auto(BufReader::new(file)),
            }
        }
    };

    if let Err(error) = read_result {
        match error {
            ErrorKind::Parse(parse_error) => eprintln!("otter_qbf: parse error: {parse_error}"),
            other => eprintln!("otter_qbf: failed to read input: {other:?}"),
        }
        exit(1);
    }

    let report = solver.solve();

    if cli.partial_certificate {
        if let Some(certificate) = solver.partial_certificate() {
            let rendered: Vec<String> = certificate
                .iter()
                .map(|literal| {
                    let sign = if literal.polarity() { "" } else { "-" };
                    format!("{sign}{}", solver.variables.name(literal.atom()))
                })
                .collect();
            println!("{}", rendered.join(" "));
        }
    }

    if cli.print_stats {
        print_stats(&solver);
    }

    println!("{report}");
    match report {
        Report::Satisfiable => exit(10),
        Report::Unsatisfiable => exit(20),
        Report::Unknown => exit(0),
    }
}
