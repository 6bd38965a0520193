//! Pure step list edits.
//!
//! Every function takes a slice and returns a new list; the input is never
//! modified. Ids are always supplied by the caller. An out-of-range index
//! returns the input unchanged.

use crate::workouts::summary::{summarize, SummaryLine, SummaryOptions};
use crate::workouts::types::Step;

/// Insert `step` at `index` (`index == len` appends).
pub fn insert_step(steps: &[Step], index: usize, step: Step) -> Vec<Step> {
    let mut out = steps.to_vec();
    if index <= out.len() {
        out.insert(index, step);
    }
    out
}

/// Insert a copy of the step at `index` right after it, with a new id.
pub fn duplicate_step(steps: &[Step], index: usize, new_id: &str) -> Vec<Step> {
    let mut out = steps.to_vec();
    if let Some(step) = steps.get(index) {
        out.insert(index + 1, step.clone().with_id(new_id));
    }
    out
}

pub fn remove_step(steps: &[Step], index: usize) -> Vec<Step> {
    let mut out = steps.to_vec();
    if index < out.len() {
        out.remove(index);
    }
    out
}

/// Move the step at `from` so that it ends up at position `to`.
pub fn move_step(steps: &[Step], from: usize, to: usize) -> Vec<Step> {
    let mut out = steps.to_vec();
    if from < out.len() && to < out.len() && from != to {
        let step = out.remove(from);
        out.insert(to, step);
    }
    out
}

/// `count` repetitions of work, each followed by the recovery when given.
pub fn build_repeats(work: &Step, recovery: Option<&Step>, count: u32) -> Vec<Step> {
    let mut out = Vec::with_capacity(count as usize * 2);
    for _ in 0..count {
        out.push(work.clone());
        if let Some(rest) = recovery {
            out.push(rest.clone());
        }
    }
    out
}

/// Replace the line at `index` by one line per repetition of its block.
pub fn unblock(lines: &[SummaryLine], index: usize, opts: &SummaryOptions) -> Vec<SummaryLine> {
    let Some(target) = lines.get(index) else {
        return lines.to_vec();
    };
    let block = &target.block;
    if block.repeat_count <= 1 {
        return lines.to_vec();
    }

    let segments = block.expand();
    let chunk = (segments.len() / block.repeat_count as usize).max(1);

    let mut out = Vec::with_capacity(lines.len() + block.repeat_count as usize);
    out.extend_from_slice(&lines[..index]);
    for repetition in segments.chunks(chunk) {
        out.extend(summarize(repetition, opts));
    }
    out.extend_from_slice(&lines[index + 1..]);
    out
}

/// All steps behind a list of summary lines, in order.
pub fn flatten(lines: &[SummaryLine]) -> Vec<Step> {
    lines.iter().flat_map(|l| l.block.expand()).collect()
}
