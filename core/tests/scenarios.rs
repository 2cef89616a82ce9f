//! Black-box tests driving the public `vm_core` API the way the `cli` crate
//! does: source text in, assembled binary loaded into memory, interpreter
//! run to completion.

use std::sync::atomic::Ordering;
use std::time::Duration;

use vm_core::{assemble, run, Console, HaltReason, Memory, MemoryLayout};

fn assemble_and_run(source: &str) -> (Memory, vm_core::RunResult) {
    let binary = assemble(source).expect("assembly should succeed");
    let memory = Memory::new(4000);
    memory.load_bytes(&binary, 0);
    let result = run(&memory, &MemoryLayout::default(), false);
    (memory, result)
}

#[test]
fn s1_minimal_program_halts_immediately() {
    let (_memory, result) = assemble_and_run(":0\nhalt\n");
    assert_eq!(result.reason, HaltReason::Halt);
    assert_eq!(result.sp, 0);
}

#[test]
fn s2_push_u64_then_halt_leaves_value_on_stack() {
    let (memory, result) = assemble_and_run(":0\npush_u64 ff\nhalt\n");
    assert_eq!(result.sp, 8);
    assert_eq!(memory.read_u64(1000), 0xFF);
}

#[test]
fn s3_unconditional_jump_skips_the_push() {
    let (_memory, result) = assemble_and_run(":0\njmp :end\npush_u8 aa\n:end\nhalt\n");
    assert_eq!(result.sp, 0);
}

#[test]
fn s4_cmp_u8_true_on_equal_operands() {
    let (memory, result) = assemble_and_run(":0\npush_u8 2a\npush_u8 2a\ncmp_u8\nhalt\n");
    assert_eq!(result.sp, 1);
    assert_eq!(memory.read_u8(1000), 1);
}

#[test]
fn s5_cmp_u8_false_on_unequal_operands() {
    let (memory, result) = assemble_and_run(":0\npush_u8 2a\npush_u8 2b\ncmp_u8\nhalt\n");
    assert_eq!(result.sp, 1);
    assert_eq!(memory.read_u8(1000), 0);
}

#[test]
fn s6_console_print_through_the_peripheral_handshake() {
    let memory = Memory::new(4000);

    // A minimal guest program that performs the printc protocol directly,
    // standing in for console/printc.bin without needing the assembler CLI
    // to have produced a .bin file on disk for this test.
    let source = "\
:0
 push_u8 58
 set_u8 bb8
 push_u8 01
 set_u8 bb9
:loop
 cpg_u8 bb9
 jmp_true :loop
 halt
";
    let binary = assemble(source).unwrap();
    memory.load_bytes(&binary, 0);

    let console = Console::start(memory.clone(), 3000, 3001);
    let result = run(&memory, &MemoryLayout::default(), false);
    console.stop();

    assert_eq!(result.reason, HaltReason::Halt);
    assert_eq!(memory.load_u8(3001, Ordering::Acquire), 0);
}

#[test]
fn assembler_error_surfaces_through_the_public_api() {
    let err = assemble(":0\nnot_a_real_mnemonic\n").unwrap_err();
    let rendered = err.render(":0\nnot_a_real_mnemonic\n");
    assert!(rendered.contains("not_a_real_mnemonic"));
}

#[test]
fn spi_spd_round_trip_through_a_full_program() {
    let (_memory, result) = assemble_and_run(":0\nspi 20\nspd 08\nhalt\n");
    assert_eq!(result.sp, 0x20 - 0x08);
}

#[test]
fn slow_peripheral_poll_does_not_deadlock_a_waiting_guest() {
    // The guest busy-waits on ENABLE exactly like console/printc.bin; this
    // just confirms the 100ms peripheral poll interval (see
    // peripheral::POLL_INTERVAL) doesn't starve a realistic program within
    // a generous wall-clock bound.
    let memory = Memory::new(4000);
    let console = Console::start(memory.clone(), 3000, 3001);

    let started = std::time::Instant::now();
    memory.write_u8(3000, b'Z');
    memory.store_u8(3001, 1, Ordering::Release);
    while memory.load_u8(3001, Ordering::Acquire) != 0 {
        std::thread::sleep(Duration::from_millis(5));
        assert!(started.elapsed() < Duration::from_secs(2), "peripheral never acknowledged");
    }

    console.stop();
}
