//! End-to-end attach/detach scenarios against the builtin catalog

use memprobe::memory::mock::{MockMemory, MockMemoryBuilder};
use memprobe::profile::{find_game, find_target, BUILTIN_TARGETS};
use memprobe::{attach, AttachError, DetachReason, FieldValue, LoopState, PointerWidth};
use std::time::Duration;
use tokio::time::timeout;

const DOS_MAIN: u64 = 0x0040_0000;
const DOS_MEM: u64 = 0x00AB_1000;

/// DOSBox 0.74-3 shaped process: the image holds a pointer to emulated
/// memory at image+0x1D3C370.
fn dosbox_mock() -> MockMemory {
    MockMemoryBuilder::new()
        .width(PointerWidth::Bits32)
        .main_module(DOS_MAIN)
        .u32(DOS_MAIN + 0x01D3_C370, DOS_MEM as u32)
        // Aurora Quest (DOS) fields
        .u32(DOS_MEM + 0x001A_2B44, 250) // gold
        .bytes(DOS_MEM + 0x001A_2B48, &40i16.to_le_bytes()) // health
        .bytes(DOS_MEM + 0x001A_2B4A, &55i16.to_le_bytes()) // max_health
        .bytes(DOS_MEM + 0x001A_2B4C, &[7]) // level
        .u32(DOS_MEM + 0x001A_2B50, 15_000) // experience
        .build()
}

const GBA_MAIN: u64 = 0x0040_0000;
const EWRAM_HOST: u64 = 0x0070_0000;
const IWRAM_HOST: u64 = 0x0080_0000;
const ROM_HOST: u64 = 0x0090_0000;

/// VisualBoyAdvance-M 2.1.4 shaped process with all three region pointers
/// seeded, plus Aurora Quest (GBA) fields including the chased one.
fn vbam_mock(with_rom: bool) -> MockMemory {
    let mut builder = MockMemoryBuilder::new()
        .width(PointerWidth::Bits32)
        .main_module(GBA_MAIN)
        .u32(GBA_MAIN + 0x0184_8FE8, EWRAM_HOST as u32)
        .u32(GBA_MAIN + 0x0184_8FEC, IWRAM_HOST as u32)
        // Fields at EWRAM 0x02025BA4..
        .u32(EWRAM_HOST + 0x2_5BA4, 1000) // gold
        .bytes(EWRAM_HOST + 0x2_5BA8, &90i16.to_le_bytes()) // health
        .bytes(EWRAM_HOST + 0x2_5BAA, &99i16.to_le_bytes()) // max_health
        .bytes(EWRAM_HOST + 0x2_5BAC, &[12]) // level
        .u32(EWRAM_HOST + 0x2_5BB0, 48_000) // experience
        // Party pointer in IWRAM 0x03002BE0 -> EWRAM 0x02010000; strength at +0x14
        .u32(IWRAM_HOST + 0x2BE0, 0x0201_0000)
        .bytes(EWRAM_HOST + 0x1_0014, &[18]);
    if with_rom {
        builder = builder.u32(GBA_MAIN + 0x0188_20EC, ROM_HOST as u32);
    }
    builder.build()
}

#[tokio::test]
async fn scenario_dosbox_attach_reads_and_writes_through() {
    let mock = dosbox_mock();
    let target = find_target("DOSBox.exe").unwrap();
    assert_eq!(target.name, "DOSBox 0.74-2 (32-bit)"); // first match wins
    let target = BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == "DOSBox 0.74-3 (32-bit)")
        .unwrap();
    let game = find_game("Aurora Quest").unwrap();

    let mut session = attach(mock.clone(), target, game).unwrap();
    let container = session.container().unwrap();

    assert_eq!(container.value("gold").unwrap(), FieldValue::U32(250));
    assert_eq!(container.value("health").unwrap(), FieldValue::I16(40));
    assert_eq!(container.value("level").unwrap(), FieldValue::U8(7));

    // A write through the container lands at the resolved host address:
    // position 0 of the Main stream maps to the pointed-to memory block
    container.set_value("gold", FieldValue::U32(123)).unwrap();
    assert_eq!(
        mock.peek(DOS_MEM + 0x001A_2B44, 4),
        123u32.to_le_bytes().to_vec()
    );

    // Actions are zero-argument guarded writes
    container.invoke("max_gold").unwrap();
    assert_eq!(container.value("gold").unwrap(), FieldValue::U32(999_999));
    assert_eq!(
        mock.peek(DOS_MEM + 0x001A_2B44, 4),
        999_999u32.to_le_bytes().to_vec()
    );

    session.detach().await;
}

#[tokio::test]
async fn scenario_vbam_multi_region_attach() {
    let mock = vbam_mock(true);
    let target = BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == "VisualBoyAdvance-M 2.1.4 (32-bit)")
        .unwrap();
    let game = find_game("Aurora Quest").unwrap();

    let mut session = attach(mock.clone(), target, game).unwrap();
    let container = session.container().unwrap();

    assert_eq!(container.value("gold").unwrap(), FieldValue::U32(1000));
    assert_eq!(container.value("max_health").unwrap(), FieldValue::I16(99));
    // Chased through IWRAM pointer into EWRAM
    assert_eq!(
        container.value("leader_strength").unwrap(),
        FieldValue::U8(18)
    );

    // An EWRAM write never lands in the ROM backing
    container.set_value("gold", FieldValue::U32(2)).unwrap();
    assert_eq!(mock.peek(ROM_HOST, 4), vec![0, 0, 0, 0]);

    session.detach().await;
}

#[tokio::test]
async fn optional_rom_region_is_tolerated() {
    // No ROM pointer seeded: its resolution reads null and the region is
    // skipped, but EWRAM/IWRAM still attach
    let mock = vbam_mock(false);
    let target = BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == "VisualBoyAdvance-M 2.1.4 (32-bit)")
        .unwrap();
    let game = find_game("Aurora Quest").unwrap();

    let mut session = attach(mock, target, game).unwrap();
    assert_eq!(
        session.container().unwrap().value("gold").unwrap(),
        FieldValue::U32(1000)
    );
    session.detach().await;
}

#[tokio::test]
async fn required_region_failure_aborts_attach() {
    // EWRAM pointer missing entirely
    let mock = MockMemoryBuilder::new()
        .width(PointerWidth::Bits32)
        .main_module(GBA_MAIN)
        .build();
    let target = BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == "VisualBoyAdvance-M 2.1.4 (32-bit)")
        .unwrap();
    let game = find_game("Aurora Quest").unwrap();

    match attach(mock, target, game) {
        Err(AttachError::Region { region, .. }) => assert_eq!(region, "EWRAM"),
        other => panic!("expected region failure, got {other:?}"),
    }
}

#[tokio::test]
async fn detach_releases_every_handle() {
    let mock = dosbox_mock();
    let target = BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == "DOSBox 0.74-3 (32-bit)")
        .unwrap();
    let game = find_game("Aurora Quest").unwrap();

    let before = mock.open_handles();
    let mut session = attach(mock.clone(), target, game).unwrap();
    assert!(mock.open_handles() > before);

    // Detach while the loop may be mid-update
    session.detach().await;
    assert_eq!(mock.open_handles(), before);

    // The same target slot is immediately reusable
    let mut fresh = attach(mock.clone(), target, game).unwrap();
    assert_eq!(
        fresh.container().unwrap().value("gold").unwrap(),
        FieldValue::U32(250)
    );
    fresh.detach().await;

    // Detach is idempotent
    session.detach().await;
    assert!(!session.is_attached());
}

#[tokio::test]
async fn target_exit_surfaces_as_silent_stop_and_detach_still_works() {
    let mock = dosbox_mock();
    let target = BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == "DOSBox 0.74-3 (32-bit)")
        .unwrap();
    let game = find_game("Aurora Quest").unwrap();

    let mut session = attach(mock.clone(), target, game).unwrap();
    mock.kill();

    let mut states = session.states();
    let state = timeout(Duration::from_secs(2), async {
        loop {
            if states.borrow().is_stopped() {
                break states.borrow().clone();
            }
            states.changed().await.unwrap();
        }
    })
    .await
    .expect("loop did not observe target exit");
    assert!(matches!(
        state,
        LoopState::Stopped(DetachReason::ProcessExited)
    ));

    // Detach after the target died must not block or fail
    timeout(Duration::from_secs(1), session.detach())
        .await
        .expect("detach blocked on a dead target");
    assert!(!session.is_attached());
}

#[tokio::test]
async fn architecture_mismatch_is_synchronous() {
    let mock = MockMemoryBuilder::new().width(PointerWidth::Bits64).build();
    let target = BUILTIN_TARGETS
        .iter()
        .find(|t| t.name == "DOSBox 0.74-3 (32-bit)")
        .unwrap();
    let game = find_game("Aurora Quest").unwrap();

    assert!(matches!(
        attach(mock, target, game),
        Err(AttachError::Architecture { .. })
    ));
}
