use mrq::select::{BufferSurface, Key, PagedState, Step, Surface};

#[test]
fn keyboard_walk_across_pages() {
    let mut state = PagedState::new(23, 10);

    // Down through the first page boundary.
    for _ in 0..10 {
        state.apply(Key::Down);
    }
    assert_eq!(state.page(), 1);
    assert_eq!(state.selected(), 10);

    // Jump to the last page; only three items live there.
    assert_eq!(state.apply(Key::PageForward), Step::Render);
    assert_eq!(state.page(), 2);
    assert_eq!(state.page_len(), 3);
    assert_eq!(state.apply(Key::Digit(3)), Step::Render);
    assert_eq!(state.selected(), 22);
    assert_eq!(state.apply(Key::Digit(4)), Step::Ignore);

    // Back up, then accept.
    assert_eq!(state.apply(Key::PageBack), Step::Render);
    assert_eq!(state.page(), 1);
    assert_eq!(state.apply(Key::Enter), Step::Accept);
}

#[test]
fn favorite_and_interrupt_steps_pass_through() {
    let mut state = PagedState::new(2, 10);
    assert_eq!(state.apply(Key::ToggleFavorite), Step::Favorite);
    assert_eq!(state.apply(Key::Interrupt), Step::Interrupt);
    assert_eq!(state.apply(Key::Escape), Step::Cancel);
}

#[test]
fn buffer_surface_redraws_in_place() {
    let mut surface = BufferSurface::new();

    surface.line("1. alpha", true).unwrap();
    surface.line("2. beta", false).unwrap();
    surface.line("page 1/1", false).unwrap();
    surface.flush().unwrap();
    assert_eq!(surface.lines, vec!["[1. alpha]", "2. beta", "page 1/1"]);

    // The next frame is drawn over the previous one.
    surface.move_up(3).unwrap();
    surface.line("1. alpha", false).unwrap();
    surface.line("2. beta", true).unwrap();
    surface.clear_down().unwrap();
    assert_eq!(surface.lines, vec!["1. alpha", "[2. beta]"]);
}

#[test]
fn clear_down_truncates_shorter_frames() {
    let mut surface = BufferSurface::new();
    surface.line("1. only", true).unwrap();
    surface.line("2. gone next frame", false).unwrap();
    surface.line("page 1/1", false).unwrap();

    surface.move_up(3).unwrap();
    surface.line("1. only", true).unwrap();
    surface.line("page 1/1", false).unwrap();
    surface.clear_down().unwrap();
    assert_eq!(surface.lines.len(), 2);
}
