//! Per-frame cheat execution.
//!
//! Called once per emulated frame. Each subcheat is a small state machine
//! driven by its DONE/TIMED bits and its frame countdown; nothing here
//! blocks or allocates.

use super::code::Trigger;
use super::table::CheatTable;
use super::SubCheat;
use crate::core::CheatBus;

/// Apply every active cheat once, in table order.
///
/// Returns the number of bytes written.
pub fn run_frame<B: CheatBus + ?Sized>(table: &mut CheatTable, bus: &mut B) -> usize {
    let mut writes = 0;
    for cheat in table.cheats_mut().iter_mut().filter(|c| c.is_active()) {
        for subcheat in cheat.subcheats_mut() {
            writes += step(subcheat, bus);
        }
    }
    writes
}

/// Advance one subcheat by one frame. Returns the number of bytes written.
fn step<B: CheatBus + ?Sized>(sub: &mut SubCheat, bus: &mut B) -> usize {
    if sub.is_done() {
        return 0;
    }

    let trigger = sub.trigger();

    // Most common case: unconditional poke every frame.
    if trigger == Trigger::Poke {
        return poke(sub, bus, sub.data);
    }

    if sub.frame_count != 0 {
        sub.frame_count -= 1;
        return 0;
    }

    match trigger {
        Trigger::PokeOnce => {
            sub.set_done();
            poke(sub, bus, sub.data)
        }
        Trigger::PokePeriodic => {
            sub.frame_count = sub.frames_til_trigger;
            poke(sub, bus, sub.data)
        }
        Trigger::PokeAfterChange => {
            if sub.is_timed() {
                sub.clear_timed();
                poke(sub, bus, sub.data)
            } else {
                if peek(sub, bus) != sub.data {
                    // Value changed: open the delay window.
                    sub.frame_count = sub.frames_til_trigger;
                    sub.set_timed();
                }
                0
            }
        }
        Trigger::DecrementGuard(amount) => {
            if sub.is_timed() {
                sub.clear_timed();
                let expected = i32::from(sub.backup) - i32::from(amount);
                if i32::from(peek(sub, bus)) != expected {
                    return poke(sub, bus, sub.data);
                }
                0
            } else {
                sub.backup = peek(sub, bus);
                sub.frame_count = 1;
                sub.set_timed();
                0
            }
        }
        Trigger::SetBits => {
            let value = peek(sub, bus) | sub.data;
            poke(sub, bus, value)
        }
        Trigger::SetBitsOnce => {
            sub.set_done();
            let value = peek(sub, bus) | sub.data;
            poke(sub, bus, value)
        }
        Trigger::SetBitsPeriodic => {
            sub.frame_count = sub.frames_til_trigger;
            let value = peek(sub, bus) | sub.data;
            poke(sub, bus, value)
        }
        Trigger::ResetBits => {
            let value = peek(sub, bus) & !sub.data;
            poke(sub, bus, value)
        }
        Trigger::ResetBitsOnce => {
            sub.set_done();
            let value = peek(sub, bus) & !sub.data;
            poke(sub, bus, value)
        }
        Trigger::ResetBitsPeriodic => {
            sub.frame_count = sub.frames_til_trigger;
            let value = peek(sub, bus) & !sub.data;
            poke(sub, bus, value)
        }
        Trigger::UserOnChange => {
            if sub.is_timed() {
                if peek(sub, bus) != sub.backup {
                    sub.set_done();
                    return poke(sub, bus, sub.data);
                }
                0
            } else {
                sub.backup = peek(sub, bus);
                sub.frame_count = 1;
                sub.set_timed();
                0
            }
        }
        Trigger::UserOnce => {
            sub.set_done();
            poke(sub, bus, sub.data)
        }
        Trigger::Poke | Trigger::Watch | Trigger::Comment | Trigger::Inert => 0,
    }
}

#[inline]
fn peek<B: CheatBus + ?Sized>(sub: &SubCheat, bus: &mut B) -> u8 {
    bus.read_byte(sub.cpu, sub.address)
}

#[inline]
fn poke<B: CheatBus + ?Sized>(sub: &SubCheat, bus: &mut B, value: u8) -> usize {
    bus.write_byte(sub.cpu, sub.address, value);
    1
}
