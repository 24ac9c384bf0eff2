use crate::model::{Model, ModelError};
use crate::trackables::TrackableId;

/// Format a value the way the palette shows it: whole numbers without a
/// fraction, fractional steps (0.5, 15.55) as-is.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// The display string for a cell: `"value/target"` while an unmet target
/// exists, nothing at zero, a check mark for a switched-on toggle, and
/// the bare value otherwise.
pub fn value_text(model: &Model, id: &TrackableId) -> Result<String, ModelError> {
    let value = model.value(id)?;
    let goal = model.goal_status(id)?;

    if let Some(target) = goal.target_value
        && target != 0.0
        && !goal.fulfilled
    {
        return Ok(format!("{}/{}", format_value(value), format_value(target)));
    }
    if value == 0.0 {
        return Ok(String::new());
    }
    if value == 1.0 && model.definition(id)?.toggle {
        return Ok("\u{2714}".to_string());
    }
    Ok(format_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trackables::TrackableDef;

    fn id(s: &str) -> TrackableId {
        TrackableId::new(s)
    }

    fn model_with(defs: Vec<(&str, TrackableDef)>) -> Model {
        let mut model = Model::new();
        model.initialize(defs.into_iter().map(|(k, d)| (id(k), d)).collect());
        model
    }

    #[test]
    fn test_value_text_cases() {
        let mut model = model_with(vec![
            (
                "hp",
                TrackableDef {
                    target: Some(21.0),
                    max: Some(650.0),
                    ..Default::default()
                },
            ),
            ("mst", TrackableDef::default()),
            (
                "barrier",
                TrackableDef {
                    toggle: true,
                    ..Default::default()
                },
            ),
            (
                "ata",
                TrackableDef {
                    increment: vec![0.5, 1.0],
                    ..Default::default()
                },
            ),
        ]);

        // unmet target is shown even at zero
        assert_eq!(value_text(&model, &id("hp")).unwrap(), "0/21");
        model.set_value(&id("hp"), 5.0).unwrap();
        assert_eq!(value_text(&model, &id("hp")).unwrap(), "5/21");
        model.set_value(&id("hp"), 21.0).unwrap();
        assert_eq!(value_text(&model, &id("hp")).unwrap(), "21");

        // zero with no target renders empty
        assert_eq!(value_text(&model, &id("mst")).unwrap(), "");
        model.set_value(&id("mst"), 3.0).unwrap();
        assert_eq!(value_text(&model, &id("mst")).unwrap(), "3");

        model.set_value(&id("barrier"), 1.0).unwrap();
        assert_eq!(value_text(&model, &id("barrier")).unwrap(), "\u{2714}");

        model.bump(&id("ata"), 0.5).unwrap();
        assert_eq!(value_text(&model, &id("ata")).unwrap(), "0.5");
    }
}
