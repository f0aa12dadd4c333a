//! Edits a synth patch with every formbind control.
//!
//! Arrow keys or `Tab` move between controls, `Space`/`Enter`/`Left`/`Right`
//! change them and `q` or `Esc` quits. Logs go to stderr; set `RUST_LOG=debug`
//! and redirect stderr to a file to follow the dispatched events.

use std::{cell::RefCell, error::Error};

use formbind::{CheckboxControl, Control, Controls, DropDownControl, SliderControl, SwitchControl};
use formbind_tui::{FormApp, FormAppBuilder, KeyCode, TuiError};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const WAVES: [(&str, &str); 4] = [
    ("sine", "Sine"),
    ("triangle", "Triangle"),
    ("saw", "Saw"),
    ("square", "Square"),
];

/// The patch being edited.
#[derive(Debug, Clone, Controls)]
struct Synth {
    /// Oscillator shape; empty when no oscillator is selected.
    wave: String,
    muted: bool,
    legato: bool,
    /// Not available on this model.
    arpeggiator: bool,
    /// Filter cutoff in kHz.
    cutoff: f64,
    #[controls(skip)]
    name: String,
}

#[derive(Debug)]
enum Edit {
    Select(String),
    Toggle(SynthKey, bool),
    Slide(SynthKey, f64),
}

impl Synth {
    fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::Select(wave) => self.wave = wave,
            Edit::Toggle(SynthKey::Muted, value) => self.muted = value,
            Edit::Toggle(SynthKey::Legato, value) => self.legato = value,
            Edit::Toggle(SynthKey::Arpeggiator, value) => self.arpeggiator = value,
            Edit::Slide(SynthKey::Cutoff, value) => self.cutoff = value,
            edit => warn!(?edit, "edit does not match its field"),
        }
    }
}

fn run(app: &mut FormApp, synth: &mut Synth) -> Result<(), TuiError> {
    loop {
        let edits = RefCell::new(Vec::<Edit>::new());
        {
            let record: &Synth = synth;
            let push = |edit: Edit| edits.borrow_mut().push(edit);
            let mut wave = DropDownControl::bound(record, Synth::WAVE, WAVES, |_: &SynthKey, value| {
                push(Edit::Select(value));
            })
            .text("Waveform")
            .none_option(true);
            let mut muted = CheckboxControl::bound(record, Synth::MUTED, |key: &SynthKey, value| {
                push(Edit::Toggle(*key, value));
            })
            .text("Mute");
            let mut legato = SwitchControl::bound(record, Synth::LEGATO, |key: &SynthKey, value| {
                push(Edit::Toggle(*key, value));
            })
            .text("Legato");
            let mut arpeggiator =
                SwitchControl::bound(record, Synth::ARPEGGIATOR, |key: &SynthKey, value| {
                    push(Edit::Toggle(*key, value));
                })
                .text("Arpeggiator")
                .disabled(true);
            let mut cutoff =
                SliderControl::bound(record, Synth::CUTOFF, 0.5, 20.0, |key: &SynthKey, value| {
                    push(Edit::Slide(*key, value));
                })
                .step(0.5)
                .text("Cutoff (kHz)");

            let mut form: [&mut dyn Control; 5] =
                [&mut wave, &mut muted, &mut legato, &mut arpeggiator, &mut cutoff];
            app.draw(&form)?;

            let key = app.next_key()?;
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(());
            }
            match app.handle_key(&mut form, key) {
                Ok(Some(outcome)) => debug!(?outcome, focus = app.focus(), "key handled"),
                Ok(None) => {}
                Err(TuiError::Bind(err)) => warn!(%err, "control rejected the key"),
                Err(err) => return Err(err),
            }
        }
        for edit in edits.into_inner() {
            synth.apply(edit);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut synth = Synth {
        wave: "saw".to_owned(),
        muted: false,
        legato: true,
        arpeggiator: false,
        cutoff: 8.0,
        name: "Init".to_owned(),
    };
    info!(patch = %synth.name, "editing patch");

    {
        let mut app = FormAppBuilder::new().build()?;
        run(&mut app, &mut synth)?;
    }

    println!("{synth:#?}");
    Ok(())
}
