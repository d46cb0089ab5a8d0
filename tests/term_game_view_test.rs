use term_tetris::core::{ActiveSnapshot, GameSnapshot, GameState};
use term_tetris::term::{FrameBuffer, GameView, Viewport};
use term_tetris::types::{GameCommand, GameMode, PieceKind, Rotation};

fn text_of(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            all.push(fb.get(x, y).unwrap().ch);
        }
        all.push('\n');
    }
    all
}

fn count(fb: &FrameBuffer, ch: char) -> usize {
    fb.glyphs().iter().filter(|g| g.ch == ch).count()
}

fn playing() -> GameSnapshot {
    GameSnapshot {
        mode: GameMode::Playing,
        ..GameSnapshot::default()
    }
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();

    // With cell_w=2 and cell_h=1:
    // board pixels = 10*2 by 20*1 => 20x20
    // plus border => 22x22
    let fb = view.render(&snap, Viewport::new(22, 22));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_centers_board_on_tall_viewports() {
    let snap = GameState::new(1).snapshot();

    // Board frame is 22 rows tall (20 + border).
    let fb = GameView::default().render(&snap, Viewport::new(22, 30));

    // start_y = (30 - 22) / 2 = 4 => top-left corner at (0,4).
    assert_eq!(fb.get(0, 4).unwrap().ch, '┌');
}

#[test]
fn term_view_renders_locked_cell_as_two_chars_wide() {
    let mut snap = playing();
    // Bottom row of the board is the last visible row.
    snap.board[21][0] = Some(PieceKind::I);

    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    // Inside border: (1,1) origin. Each cell is 2 chars wide.
    let y0 = 1 + 19;
    assert_eq!(fb.get(1, y0).unwrap().ch, '█');
    assert_eq!(fb.get(2, y0).unwrap().ch, '█');
    assert_eq!(fb.get(3, y0).unwrap().ch, '·');
}

#[test]
fn term_view_draws_active_piece_and_ghost() {
    let mut snap = playing();
    snap.active = Some(ActiveSnapshot {
        kind: PieceKind::T,
        rotation: Rotation::North,
        x: 4,
        y: 5,
    });
    snap.ghost_y = Some(20);

    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    assert_eq!(count(&fb, '█'), 8);
    assert_eq!(count(&fb, '░'), 8);
    // Stem of the T: board (5, 5) => visible row 3
    assert_eq!(fb.get(1 + 5 * 2, 1 + 3).unwrap().ch, '█');
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut gs = GameState::new(1);
    gs.apply_command(GameCommand::StartOrRestart);
    let mut snap = gs.snapshot();
    snap.score = 1234;
    snap.level = 2;

    let all = text_of(&GameView::default().render(&snap, Viewport::new(60, 22)));
    assert!(all.contains("STATS"));
    assert!(all.contains("Score: 1234"));
    assert!(all.contains("Level: 2"));
    assert!(all.contains("NEXT"));
    assert!(all.contains("CONTROLS"));
}

#[test]
fn term_view_hides_the_board_while_paused() {
    let mut snap = playing();
    snap.mode = GameMode::Paused;
    snap.board[21][0] = Some(PieceKind::I);

    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    assert!(text_of(&fb).contains("PAUSED"));
    assert_eq!(count(&fb, '█'), 0);
}

#[test]
fn term_view_game_over_message() {
    let snap = GameSnapshot {
        mode: GameMode::GameOver,
        ..GameSnapshot::default()
    };

    let all = text_of(&GameView::default().render(&snap, Viewport::new(80, 24)));
    assert!(all.contains("GAME OVER"));
    assert!(all.contains("Press Enter to Play Again"));
}

#[test]
fn term_view_render_into_reuses_the_buffer() {
    let snap = playing();
    let view = GameView::default();
    let mut fb = FrameBuffer::new(10, 10);

    view.render_into(&snap, Viewport::new(40, 24), &mut fb);
    assert_eq!((fb.width(), fb.height()), (40, 24));
    assert_eq!(fb, view.render(&snap, Viewport::new(40, 24)));
}
