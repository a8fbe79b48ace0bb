use proptest::prelude::*;
use vmstate::{Architecture, ErrorKind, REGISTER_FILE_SIZE, VmState};

fn prepared(arch: Architecture) -> VmState {
    let mut state = VmState::new(arch);
    state.setup_paging().unwrap();
    state.setup_gdt().unwrap();
    state.inject_code(&[0x0f, 0x01, 0xc1, 0xcc]).unwrap();
    state
}

#[test]
fn image_starts_with_register_file() {
    let state = prepared(Architecture::X64);
    let image = state.raw();
    assert_eq!(image.len(), REGISTER_FILE_SIZE + state.memory.as_bytes().len());
    assert_eq!(&image[REGISTER_FILE_SIZE..], state.memory.as_bytes());
    assert_eq!(VmState::from_raw(&image).unwrap(), state);
}

#[test]
fn truncated_image_is_rejected() {
    let image = prepared(Architecture::X86).raw();
    let err = VmState::from_raw(&image[..REGISTER_FILE_SIZE - 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);

    // A register file alone is a valid image with empty memory.
    let bare = VmState::from_raw(&image[..REGISTER_FILE_SIZE]).unwrap();
    assert!(bare.memory.is_empty());
    assert_eq!(bare.mode(), prepared(Architecture::X86).mode());
}

proptest! {
    #[test]
    fn arbitrary_images_survive_a_reload(
        regs in proptest::collection::vec(any::<u8>(), REGISTER_FILE_SIZE),
        memory in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut image = regs;
        image.extend_from_slice(&memory);

        let state = VmState::from_raw(&image).unwrap();
        prop_assert_eq!(state.memory.as_bytes(), memory.as_slice());
        let again = VmState::from_raw(&state.raw()).unwrap();
        prop_assert_eq!(again, state);
    }
}
