// Integration tests for chained machines

use intcode::interpreter::errors::{PipelineError, VmError};
use intcode::memory::Word;
use intcode::pipeline::Pipeline;
use intcode::program::Program;

const SERIES: [Word; 17] = [
    3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0,
];

const SERIES_LONG: [Word; 34] = [
    3, 31, 3, 32, 1002, 32, 10, 32, 1001, 31, -2, 31, 1007, 31, 0, 33, 1002, 33, 7, 33, 1, 33, 31,
    31, 1, 32, 31, 31, 4, 31, 99, 0, 0, 0,
];

const FEEDBACK: [Word; 29] = [
    3, 26, 1001, 26, -4, 26, 3, 27, 1002, 27, 2, 27, 1, 27, 26, 27, 4, 27, 1001, 28, -1, 28, 1005,
    28, 6, 99, 0, 0, 5,
];

/// All orderings of `values`
fn permutations(values: &[Word]) -> Vec<Vec<Word>> {
    if values.len() <= 1 {
        return vec![values.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..values.len() {
        let mut rest = values.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            result.push(tail);
        }
    }
    result
}

fn series_signal(program: &[Word], phases: &[Word]) -> Word {
    let mut pipeline = Pipeline::new(program, phases.len()).expect("Pipeline creation failed");
    pipeline.set_phases(phases).expect("Phase setup failed");
    pipeline.run_series(0).expect("Series run failed")
}

fn feedback_signal(program: &[Word], phases: &[Word]) -> Word {
    let mut pipeline = Pipeline::new(program, phases.len()).expect("Pipeline creation failed");
    pipeline.set_phases(phases).expect("Phase setup failed");
    pipeline.run_feedback(0).expect("Feedback run failed")
}

#[test]
fn test_series_with_given_phases() {
    assert_eq!(series_signal(&SERIES, &[4, 3, 2, 1, 0]), 43210);
    assert_eq!(series_signal(&SERIES_LONG, &[1, 0, 4, 3, 2]), 65210);
}

#[test]
fn test_series_best_phase_order() {
    let best = permutations(&[0, 1, 2, 3, 4])
        .iter()
        .map(|phases| series_signal(&SERIES, phases))
        .max();
    assert_eq!(best, Some(43210));
}

#[test]
fn test_feedback_with_given_phases() {
    assert_eq!(feedback_signal(&FEEDBACK, &[9, 8, 7, 6, 5]), 139629729);
}

#[test]
fn test_feedback_halts_every_stage() {
    let mut pipeline = Pipeline::new(&FEEDBACK[..], 5).unwrap();
    pipeline.set_phases(&[9, 8, 7, 6, 5]).unwrap();
    pipeline.run_feedback(0).unwrap();
    assert!(pipeline.is_halted());
    assert_eq!(pipeline.len(), 5);
    for stage in pipeline.stages() {
        assert!(stage.is_halted());
        assert_eq!(stage.output_len(), 0);
        assert_eq!(stage.input_len(), 0);
    }
}

#[test]
fn test_reset_allows_rerun() {
    let mut pipeline = Pipeline::new(&SERIES[..], 5).unwrap();
    pipeline.set_phases(&[4, 3, 2, 1, 0]).unwrap();
    assert_eq!(pipeline.run_series(0), Ok(43210));

    pipeline.reset();
    assert!(!pipeline.is_halted());
    pipeline.set_phases(&[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(pipeline.run_series(0), Ok(1234));
}

#[test]
fn test_load_new_program() {
    let mut pipeline = Pipeline::new(&SERIES[..], 5).unwrap();
    pipeline.load(Program::from(&FEEDBACK[..]));
    pipeline.set_phases(&[9, 8, 7, 6, 5]).unwrap();
    assert_eq!(pipeline.run_feedback(0), Ok(139629729));
}

#[test]
fn test_empty_pipeline_rejected() {
    assert!(matches!(
        Pipeline::new(&SERIES[..], 0),
        Err(PipelineError::EmptyPipeline)
    ));
}

#[test]
fn test_phase_count_mismatch() {
    let mut pipeline = Pipeline::new(&SERIES[..], 5).unwrap();
    assert_eq!(
        pipeline.set_phases(&[1, 2, 3]),
        Err(PipelineError::PhaseCountMismatch {
            expected: 5,
            got: 3
        })
    );
}

#[test]
fn test_stage_without_output() {
    // Reads its input and halts without writing anything
    let program: [Word; 3] = [3, 0, 99];
    let mut pipeline = Pipeline::new(&program[..], 2).unwrap();
    assert_eq!(
        pipeline.run_series(1),
        Err(PipelineError::NoOutput { stage: 0 })
    );
}

#[test]
fn test_stage_fault_reports_stage() {
    // Phase 0 outputs 5 and halts, any other phase reads address -1
    let program: [Word; 12] = [3, 11, 1005, 11, 9, 104, 5, 99, 0, 4, -1, 0];
    let mut pipeline = Pipeline::new(&program[..], 2).unwrap();
    pipeline.set_phases(&[0, 1]).unwrap();
    let err = pipeline.run_series(0).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Vm {
            stage: 1,
            source: VmError::NegativeAddress { value: -1 }
        }
    );
}
