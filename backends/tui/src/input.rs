//! Maps key presses onto control change events.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use formbind::{ChangeEvent, ControlView, SelectView, SliderView};

/// Key presses a slider without a step takes to cross its range.
const DEFAULT_SLIDER_STEPS: f64 = 100.0;

/// Translates a key press on the focused control into the event its widget
/// would emit, if any.
///
/// - checkbox, switch: `Space` or `Enter` flips the state;
/// - dropdown: `Left`/`Right` pick the previous/next item, wrapping around;
///   `Space` and `Enter` behave like `Right`;
/// - slider: `Left`/`Right` move by one step, `Home`/`End` jump to the bounds.
///
/// Disabled controls, key releases, and moves that would not change a slider
/// produce nothing.
#[must_use]
pub fn event_for(view: &ControlView, key: KeyEvent) -> Option<ChangeEvent> {
    if key.kind == KeyEventKind::Release || view.is_disabled() {
        return None;
    }
    match view {
        ControlView::Checkbox(view) => toggle(view.checked, key.code),
        ControlView::Switch(view) => toggle(view.checked, key.code),
        ControlView::Select(view) => match key.code {
            KeyCode::Left => cycle(view, false),
            KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => cycle(view, true),
            _ => None,
        },
        ControlView::Slider(view) => slide(view, key.code),
    }
}

fn toggle(checked: bool, code: KeyCode) -> Option<ChangeEvent> {
    matches!(code, KeyCode::Char(' ') | KeyCode::Enter).then_some(ChangeEvent::Toggle(!checked))
}

fn cycle(view: &SelectView, forward: bool) -> Option<ChangeEvent> {
    let len = view.items.len();
    if len == 0 {
        return None;
    }
    let next = match (view.position(), forward) {
        (Some(index), true) => (index + 1) % len,
        (Some(index), false) => (index + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    Some(ChangeEvent::Select(view.items[next].value.clone()))
}

fn slide(view: &SliderView, code: KeyCode) -> Option<ChangeEvent> {
    let step = view
        .step
        .unwrap_or((view.max - view.min) / DEFAULT_SLIDER_STEPS);
    let target = match code {
        KeyCode::Left if step > 0.0 => view.quantize(view.value - step),
        KeyCode::Right if step > 0.0 => view.quantize(view.value + step),
        KeyCode::Home => view.min,
        KeyCode::End => view.max,
        _ => return None,
    };
    #[allow(clippy::float_cmp)]
    let unchanged = target == view.value;
    (!unchanged).then_some(ChangeEvent::Slide(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use formbind::{CheckboxControl, DropDownControl, SliderControl, SwitchControl};
    use serde_json::json;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dropdown_view(selected: &str) -> ControlView {
        let controls = json!({ "wave": selected });
        DropDownControl::new(&controls, "wave", [("sine", "Sine"), ("saw", "Saw")], |_: &String, _| {})
            .none_option(true)
            .render()
            .unwrap()
            .into()
    }

    fn slider_view(value: f64, step: Option<f64>) -> ControlView {
        let controls = json!({ "gain": value });
        let slider = SliderControl::new(&controls, "gain", 0.0, 10.0, |_: &String, _| {});
        let slider = match step {
            Some(step) => slider.step(step),
            None => slider,
        };
        slider.render().unwrap().into()
    }

    #[test]
    fn space_flips_booleans() {
        let controls = json!({ "muted": false });
        let view: ControlView = CheckboxControl::new(&controls, "muted", |_: &String, _| {})
            .render()
            .unwrap()
            .into();
        assert_eq!(event_for(&view, press(KeyCode::Char(' '))), Some(ChangeEvent::Toggle(true)));
        assert_eq!(event_for(&view, press(KeyCode::Left)), None);
    }

    #[test]
    fn disabled_switch_ignores_keys() {
        let controls = json!({ "legato": true });
        let view: ControlView = SwitchControl::new(&controls, "legato", |_: &String, _| {})
            .disabled(true)
            .render()
            .unwrap()
            .into();
        assert_eq!(event_for(&view, press(KeyCode::Enter)), None);
    }

    #[test]
    fn dropdown_cycles_with_wraparound() {
        let view = dropdown_view("saw");
        assert_eq!(event_for(&view, press(KeyCode::Right)), Some(ChangeEvent::Select(String::new())));
        assert_eq!(event_for(&view, press(KeyCode::Left)), Some(ChangeEvent::Select("sine".into())));
        let view = dropdown_view("");
        assert_eq!(event_for(&view, press(KeyCode::Left)), Some(ChangeEvent::Select("saw".into())));
    }

    #[test]
    fn slider_steps_and_stops_at_bounds() {
        let view = slider_view(4.0, Some(2.0));
        assert_eq!(event_for(&view, press(KeyCode::Right)), Some(ChangeEvent::Slide(6.0)));
        let view = slider_view(10.0, Some(2.0));
        assert_eq!(event_for(&view, press(KeyCode::Right)), None);
        assert_eq!(event_for(&view, press(KeyCode::Home)), Some(ChangeEvent::Slide(0.0)));
        let view = slider_view(5.0, None);
        match event_for(&view, press(KeyCode::Left)) {
            Some(ChangeEvent::Slide(value)) => assert!((value - 4.9).abs() < 1e-9),
            other => panic!("expected a slide, got {other:?}"),
        }
    }

    #[test]
    fn releases_are_ignored() {
        let view = slider_view(5.0, None);
        let mut key = press(KeyCode::Right);
        key.kind = KeyEventKind::Release;
        assert_eq!(event_for(&view, key), None);
    }
}
