//! Bytecode compiler
//!
//! Lowers the AST into a flat instruction vector. Emission is a single
//! pre-order walk; forward jump targets are unknown while a fragment is
//! being emitted, so `Split`/`Jump` are written with placeholder targets
//! and patched once the fragment ends. Every rule keeps the invariant that
//! a fragment falls through its end having matched its sub-language at the
//! current input position.

use crate::ast::Ast;
use crate::charclass::ClassKind;

/// One VM instruction
///
/// Targets are absolute indices into the program. Fall-through to `pc + 1`
/// is the default control transfer; only `Jump`, `Split` and `Match` leave
/// the straight line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    /// Match one specific byte
    Char(u8),
    /// Match any byte, newline included
    Any,
    /// Match a byte in an inclusive range
    Range(u8, u8),
    /// Match a byte in a 128-bit set
    Class { low: u64, high: u64 },
    /// Match a byte NOT in a 128-bit set
    NotClass { low: u64, high: u64 },
    /// Match through a named-class predicate, optionally negated
    ClassPred { kind: ClassKind, negated: bool },
    /// Unconditional transfer
    Jump(usize),
    /// Fork: continue at the first target, record the second as the
    /// backtrack alternative
    Split(usize, usize),
    /// Store the current input offset into a capture slot
    Save(usize),
    /// Accept
    Match,
    /// Zero-width: succeed only at input offset 0
    AnchorStart,
    /// Zero-width: succeed only at end of input
    AnchorEnd,
    /// Back-reference to a group; unconditionally fails at run time
    Backref(u32),
}

/// A compiled pattern: instructions plus the number of capture pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The instruction sequence, terminated by a single `Match`
    pub insts: Vec<Inst>,
    /// Capture slot pairs including pair 0 (the whole match)
    pub capture_count: usize,
}

/// AST-to-bytecode compiler
pub struct Compiler {
    insts: Vec<Inst>,
}

impl Compiler {
    /// Compile a parsed pattern; `captures` is the parser's group count
    pub fn compile(root: &Ast, captures: u32) -> Program {
        let mut compiler = Compiler { insts: Vec::new() };
        compiler.emit_node(root);
        compiler.emit(Inst::Match);
        Program {
            insts: compiler.insts,
            capture_count: captures as usize + 1,
        }
    }

    fn emit(&mut self, inst: Inst) -> usize {
        self.insts.push(inst);
        self.insts.len() - 1
    }

    fn patch_split(&mut self, at: usize, preferred: usize, alternate: usize) {
        self.insts[at] = Inst::Split(preferred, alternate);
    }

    fn patch_jump(&mut self, at: usize, target: usize) {
        self.insts[at] = Inst::Jump(target);
    }

    fn emit_node(&mut self, node: &Ast) {
        match node {
            Ast::Literal(byte) => {
                self.emit(Inst::Char(*byte));
            }

            Ast::Dot => {
                self.emit(Inst::Any);
            }

            Ast::Class(set) => {
                match set.predicate {
                    Some(kind) => self.emit(Inst::ClassPred {
                        kind,
                        negated: false,
                    }),
                    None => self.emit(Inst::Class {
                        low: set.low,
                        high: set.high,
                    }),
                };
            }

            Ast::NotClass(set) => {
                // The set stays positive; the opcode carries the negation
                match set.predicate {
                    Some(kind) => self.emit(Inst::ClassPred {
                        kind,
                        negated: true,
                    }),
                    None => self.emit(Inst::NotClass {
                        low: set.low,
                        high: set.high,
                    }),
                };
            }

            Ast::AnchorStart => {
                self.emit(Inst::AnchorStart);
            }

            Ast::AnchorEnd => {
                self.emit(Inst::AnchorEnd);
            }

            Ast::Concat(left, right) => {
                self.emit_node(left);
                self.emit_node(right);
            }

            Ast::Alternate(left, right) => {
                //   split L, R
                // L: <left>
                //   jump end
                // R: <right>
                // end:
                let split_pos = self.emit(Inst::Split(0, 0));
                self.emit_node(left);
                let jump_pos = self.emit(Inst::Jump(0));
                self.patch_split(split_pos, split_pos + 1, jump_pos + 1);
                self.emit_node(right);
                self.patch_jump(jump_pos, self.insts.len());
            }

            Ast::Repeat { child, min, max, .. } => self.emit_repeat(child, *min, *max),

            Ast::Group { child, index } => {
                let index = *index as usize;
                self.emit(Inst::Save(index * 2));
                self.emit_node(child);
                self.emit(Inst::Save(index * 2 + 1));
            }

            Ast::Backref(group) => {
                self.emit(Inst::Backref(*group));
            }
        }
    }

    fn emit_repeat(&mut self, child: &Ast, min: u32, max: u32) {
        if max == u32::MAX {
            if min == 0 {
                // a*:
                //   s: split body, after
                //   body: <child>
                //   jump s
                //   after:
                let split_pos = self.emit(Inst::Split(0, 0));
                self.emit_node(child);
                let jump_pos = self.emit(Inst::Jump(split_pos));
                self.patch_split(split_pos, split_pos + 1, jump_pos + 1);
            } else {
                // a+: one mandatory copy, then the star loop over a second
                self.emit_node(child);
                let split_pos = self.emit(Inst::Split(0, 0));
                self.emit_node(child);
                let jump_pos = self.emit(Inst::Jump(split_pos));
                self.patch_split(split_pos, split_pos + 1, jump_pos + 1);
            }
        } else if max == 1 && min == 0 {
            // a?:
            //   split body, after
            //   body: <child>
            //   after:
            let split_pos = self.emit(Inst::Split(0, 0));
            self.emit_node(child);
            let after = self.insts.len();
            self.patch_split(split_pos, split_pos + 1, after);
        } else if max == 1 {
            self.emit_node(child);
        } else {
            // {n} and {n,m}: only the mandatory copies are emitted; the
            // optional tail past n is dropped
            for _ in 0..min {
                self.emit_node(child);
            }
        }
    }
}
