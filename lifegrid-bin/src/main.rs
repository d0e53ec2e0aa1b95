use std::time::Instant;

use lifegrid::{Board, UVec2};

mod stats;
use stats::{Stats, GEN_RATE, ITERATE, RENDER};

const BOARD_SIZE: UVec2 = UVec2::new(64, 32);
const FILL_RATIO: f32 = 0.5;
const GENERATIONS: u32 = 100;

fn main() {
    let mut board = Board::new(BOARD_SIZE).expect("board dimensions are non-zero");
    board.fill_rand(FILL_RATIO, rand::thread_rng());
    println!("{}", export_txt(&board));

    let mut stats = Stats::new();
    let epoch = Instant::now();
    for _ in 0..GENERATIONS {
        stats.start(ITERATE, epoch.elapsed().as_millis() as u64);
        if let Err(err) = board.advance() {
            eprintln!("could not advance generation: {err}");
            std::process::exit(1);
        }
        stats.stop(ITERATE, epoch.elapsed().as_millis() as u64);
    }
    let elapsed = epoch.elapsed();

    stats.start(RENDER, epoch.elapsed().as_millis() as u64);
    let txt = export_txt(&board);
    stats.stop(RENDER, epoch.elapsed().as_millis() as u64);
    println!("{txt}");

    let rate = GENERATIONS as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    stats.set(GEN_RATE, rate as u64);
    println!(
        "{} generations, {} cells alive",
        GENERATIONS,
        board.alive().len()
    );
    print!("{stats}");
}

fn export_txt(board: &Board) -> String {
    let size = board.size();
    let mut s = String::with_capacity((size.x * size.y + size.y) as usize);
    for (pos, state) in board.iter() {
        s.push(if state.is_alive() { '#' } else { ' ' });
        if pos.x + 1 == size.x as i32 {
            s.push('\n');
        }
    }
    s
}
