use std::io::{stdout, BufWriter, Stdout};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_odyssey::audio::MusicPlayer;
use space_odyssey::compute::{init_state, move_stuff, GameState};
use space_odyssey::config::{init_logging, Config};
use space_odyssey::display::{Assets, Renderer};
use space_odyssey::input::InputTracker;
use space_odyssey::platform::{self, Terminal};

/// Everything one run of the game owns, built once in `start`.
struct Game {
    terminal: Terminal<BufWriter<Stdout>>,
    renderer: Renderer,
    assets: Assets,
    music: MusicPlayer,
    input: InputTracker,
    state: GameState,
    rng: StdRng,
    last_frame: Instant,
}

impl Game {
    fn start(config: Config) -> anyhow::Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("starting (seed {}, {} fps)", seed, config.fps);

        let assets = Assets::load(&config.assets);
        let music = if config.mute {
            MusicPlayer::silent()
        } else {
            MusicPlayer::open(&config.assets)
        };

        let viewport = platform::viewport().context("querying terminal size")?;
        let terminal = Terminal::open(BufWriter::new(stdout())).context("opening terminal")?;

        Ok(Game {
            terminal,
            renderer: Renderer::new(viewport),
            assets,
            music,
            input: InputTracker::new(),
            state: init_state(),
            rng: StdRng::seed_from_u64(seed),
            last_frame: Instant::now(),
        })
    }

    /// Poll devices and update key states.  Returns `false` to quit.
    fn check_input(&mut self) -> bool {
        let viewport = self.renderer.canvas().viewport();
        let events = match self.terminal.poll(&viewport) {
            Ok(events) => events,
            Err(e) => {
                log::error!("input polling failed: {}", e);
                return false;
            }
        };
        let held = self.terminal.keyboard_snapshot();
        self.input.update(&events, &held);
        !self.input.wants_quit()
    }

    fn move_stuff(&mut self) {
        for cue in move_stuff(&mut self.state, &self.input, &mut self.rng) {
            self.music.apply(cue);
        }
        let now = Instant::now();
        self.music.update(now - self.last_frame);
        self.last_frame = now;
    }

    fn draw(&mut self) {
        match platform::viewport() {
            Ok(viewport) => self.renderer.resize(viewport),
            Err(e) => log::warn!("terminal size unavailable: {}", e),
        }
        if let Err(e) = self
            .renderer
            .draw(self.terminal.out(), &self.state, &self.assets)
        {
            log::warn!("{}", e);
        }
    }

    fn finish(self) {
        // Silence the music before the terminal comes back.
        drop(self.music);
        self.terminal.close();
        log::info!("finished");
    }
}

/// Leave the alternate screen before the panic message is printed, or it
/// vanishes with the screen.  `Terminal`'s drop sends the same sequences
/// again while unwinding; terminals ignore the repeats.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        platform::restore_terminal(&mut stdout(), true);
        log::error!("panic: {}", info);
        default_hook(info);
    }));
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;

    install_panic_hook();

    let frame = config.frame_duration();
    let mut game = Game::start(config)?;

    loop {
        let frame_start = Instant::now();
        if !game.check_input() {
            break;
        }
        game.move_stuff();
        game.draw();

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }

    game.finish();
    Ok(())
}
