//! Human-readable rendering of a state.
//!
//! ```text
//! ==================== REGISTER STATE =====================
//!
//! rax: { value:0x0 }
//! cs: { base:0x0 limit:0xffffffff selector:0x8 type:0xb s:0x1 ... }
//!
//! ===================== MEMORY STATE ======================
//!
//! 00000000: 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
//! ```

use crate::state::VmState;
use core::fmt;

const BYTES_PER_ROW: usize = 16;

/// [`fmt::Display`] adapter returned by [`VmState::dump`].
pub struct Dump<'a> {
    state: &'a VmState,
    registers: bool,
    memory: bool,
}

impl VmState {
    /// Render registers and/or memory. Use with `{}`.
    #[must_use]
    pub const fn dump(&self, show_registers: bool, show_memory: bool) -> Dump<'_> {
        Dump {
            state: self,
            registers: show_registers,
            memory: show_memory,
        }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.registers {
            writeln!(f, "==================== REGISTER STATE =====================")?;
            writeln!(f)?;
            for (name, fields) in self.state.regs.fields() {
                write!(f, "{name}: {{")?;
                for (field, value) in fields {
                    write!(f, " {field}:{value:#x}")?;
                }
                writeln!(f, " }}")?;
            }
            writeln!(f)?;
        }

        if self.memory {
            writeln!(f, "===================== MEMORY STATE ======================")?;
            writeln!(f)?;
            let bytes = self.state.memory.as_bytes();
            for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
                write!(f, "{:08x}:", row * BYTES_PER_ROW)?;
                for byte in chunk {
                    write!(f, " {byte:02x}")?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Architecture, VmState};

    #[test]
    fn registers_are_rendered_by_field() {
        let state = VmState::new(Architecture::X86);
        let text = state.dump(true, false).to_string();
        assert!(text.starts_with("==================== REGISTER STATE"));
        assert!(text.contains("\nrip: { value:0x0 }\n"));
        assert!(text.contains("\ncr0: { pe:0x1 mp:0x0 "));
        assert!(text.contains("\ngdtr: { base:0x0 limit:0x0 }\n"));
        assert!(!text.contains("MEMORY STATE"));
    }

    #[test]
    fn memory_rows_have_sixteen_bytes() {
        let mut state = VmState::new(Architecture::X86);
        state.inject_code(&[0xab; 20]).unwrap();
        let text = state.dump(false, true).to_string();
        let rows: Vec<&str> = text.lines().filter(|l| l.contains(':')).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("00000000: ab ab"));
        assert_eq!(rows[1], "00000010: ab ab ab ab");
    }
}
