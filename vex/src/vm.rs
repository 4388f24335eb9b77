//! Backtracking virtual machine
//!
//! Interprets a compiled [`Program`] against an input byte string. The VM
//! is a depth-first backtracker: `Split` pushes the alternate path onto a
//! frame stack together with a snapshot of the capture vector, and any
//! failure pops the most recent frame and resumes there. Restoring the
//! snapshot is what gives groups their correct spans when a preferred
//! branch is rejected after its `Save`s already fired.
//!
//! There is no step budget and no stack cap; adversarial patterns such as
//! `(a+)+b` can backtrack exponentially.

use crate::charclass;
use crate::compiler::{Inst, Program};
use crate::engine::{Capture, MatchResult};

/// A deferred alternative recorded at a `Split`
#[derive(Debug, Clone)]
struct Frame {
    pc: usize,
    text_pos: usize,
    captures: Vec<Option<usize>>,
}

/// Execution state for one pattern
///
/// The capture vector and frame stack are scratch space reused across
/// calls; both are reset at the start of every [`Vm::execute_at`].
#[derive(Debug, Clone)]
pub struct Vm {
    capture_count: usize,
    captures: Vec<Option<usize>>,
    stack: Vec<Frame>,
}

impl Vm {
    /// Create a VM for programs with the given number of capture pairs
    pub fn new(capture_count: usize) -> Self {
        Vm {
            capture_count,
            captures: vec![None; capture_count * 2],
            stack: Vec::new(),
        }
    }

    /// Attempt a match starting at exactly `start`
    pub fn execute_at(
        &mut self,
        program: &Program,
        text: &[u8],
        start: usize,
    ) -> Option<MatchResult> {
        self.captures.clear();
        self.captures.resize(self.capture_count * 2, None);
        self.stack.clear();
        self.captures[0] = Some(start);

        let mut pc = 0;
        let mut text_pos = start;

        loop {
            match program.insts[pc] {
                Inst::Char(expected) => {
                    if text_pos < text.len() && text[text_pos] == expected {
                        pc += 1;
                        text_pos += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                Inst::Any => {
                    if text_pos < text.len() {
                        pc += 1;
                        text_pos += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                Inst::Range(lo, hi) => {
                    if text_pos < text.len() && (lo..=hi).contains(&text[text_pos]) {
                        pc += 1;
                        text_pos += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                Inst::Class { low, high } => {
                    if text_pos < text.len() && charclass::in_class(low, high, text[text_pos]) {
                        pc += 1;
                        text_pos += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                Inst::NotClass { low, high } => {
                    if text_pos < text.len() && !charclass::in_class(low, high, text[text_pos]) {
                        pc += 1;
                        text_pos += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                Inst::ClassPred { kind, negated } => {
                    if text_pos < text.len() && (kind.matches(text[text_pos]) != negated) {
                        pc += 1;
                        text_pos += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                Inst::Jump(target) => pc = target,

                Inst::Split(preferred, alternate) => {
                    self.stack.push(Frame {
                        pc: alternate,
                        text_pos,
                        captures: self.captures.clone(),
                    });
                    pc = preferred;
                }

                Inst::Save(slot) => {
                    self.captures[slot] = Some(text_pos);
                    pc += 1;
                }

                Inst::Match => {
                    self.captures[1] = Some(text_pos);
                    return Some(self.build_result(text));
                }

                Inst::AnchorStart => {
                    if text_pos == 0 {
                        pc += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                Inst::AnchorEnd => {
                    if text_pos == text.len() {
                        pc += 1;
                    } else if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }

                // Deliberately unimplemented: a back-reference kills its path
                Inst::Backref(_) => {
                    if !self.restore(&mut pc, &mut text_pos) {
                        return None;
                    }
                }
            }
        }
    }

    /// Probe successive offsets `start..=len` for the first hit
    ///
    /// A zero-width hit strictly before end-of-input is skipped and the
    /// probe advances one byte; only at end-of-input is a zero-width hit
    /// returned. This keeps `replace` from splicing between every byte of
    /// the input on nullable patterns.
    pub fn search(
        &mut self,
        program: &Program,
        text: &[u8],
        start: usize,
    ) -> Option<MatchResult> {
        let mut pos = start;
        while pos <= text.len() {
            if let Some(result) = self.execute_at(program, text, pos) {
                if result.matched_text.is_empty() && pos < text.len() {
                    pos += 1;
                    continue;
                }
                return Some(result);
            }
            pos += 1;
        }
        None
    }

    /// Pop a backtrack frame into `pc`/`text_pos`; false when exhausted
    fn restore(&mut self, pc: &mut usize, text_pos: &mut usize) -> bool {
        match self.stack.pop() {
            Some(frame) => {
                *pc = frame.pc;
                *text_pos = frame.text_pos;
                self.captures = frame.captures;
                true
            }
            None => false,
        }
    }

    /// Turn the raw capture vector into a reported result
    ///
    /// A group strictly contained in another group's span is dropped from
    /// the list; surviving groups that never matched (or have an empty or
    /// inverted span) become `None` entries at the same position.
    fn build_result(&self, text: &[u8]) -> MatchResult {
        let start = self.captures[0].unwrap_or(0);
        let end = self.captures[1].unwrap_or(start);

        let mut contained = vec![false; self.capture_count];
        for i in 1..self.capture_count {
            let (i_start, i_end) = match (self.captures[i * 2], self.captures[i * 2 + 1]) {
                (Some(s), Some(e)) => (s, e),
                _ => continue,
            };
            for j in 1..self.capture_count {
                if i == j || contained[j] {
                    continue;
                }
                let (j_start, j_end) = match (self.captures[j * 2], self.captures[j * 2 + 1]) {
                    (Some(s), Some(e)) => (s, e),
                    _ => continue,
                };
                if j_start <= i_start && i_end <= j_end && (j_start < i_start || i_end < j_end) {
                    contained[i] = true;
                    break;
                }
            }
        }

        let mut captures = Vec::new();
        for i in 1..self.capture_count {
            if contained[i] {
                continue;
            }
            match (self.captures[i * 2], self.captures[i * 2 + 1]) {
                (Some(s), Some(e)) if e > s => captures.push(Some(Capture {
                    start: s,
                    end: e,
                    text: text[s..e].to_vec(),
                })),
                _ => captures.push(None),
            }
        }

        MatchResult {
            position: start,
            matched_text: text[start..end].to_vec(),
            captures,
        }
    }
}
