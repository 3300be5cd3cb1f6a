//! The city generator panel: four integer spinners and three action buttons.
//!
//! Mirrors the classic parameter form - ground dimensions feed Generate
//! Ground, the full set feeds Generate Buildings, and Clear Buildings wipes
//! the current building set.

use bevy::prelude::*;

use crate::world::city::{ClearCity, GenerateCity, GenerateGround};

const PANEL_BG: Color = Color::srgba(0.08, 0.09, 0.12, 0.92);
const BUTTON_IDLE: Color = Color::srgba(0.14, 0.16, 0.2, 0.95);
const BUTTON_HOVER: Color = Color::srgba(0.2, 0.23, 0.28, 0.95);
const BUTTON_PRESSED: Color = Color::srgba(0.28, 0.36, 0.5, 0.95);
const TEXT_COLOR: Color = Color::srgb(0.85, 0.88, 0.95);
const LABEL_COLOR: Color = Color::srgb(0.6, 0.65, 0.72);

/// Current form values, clamped to each field's range.
#[derive(Resource)]
pub struct ParameterForm {
    pub width: u32,
    pub height: u32,
    pub max_height: u32,
    pub spacing: u32,
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            max_height: 3,
            spacing: 5,
        }
    }
}

impl ParameterForm {
    pub fn get(&self, field: ParamField) -> u32 {
        match field {
            ParamField::Width => self.width,
            ParamField::Height => self.height,
            ParamField::MaxHeight => self.max_height,
            ParamField::Spacing => self.spacing,
        }
    }

    pub fn adjust(&mut self, field: ParamField, delta: i32) {
        let (min, max) = field.range();
        let value = (self.get(field) as i32 + delta).clamp(min as i32, max as i32) as u32;
        match field {
            ParamField::Width => self.width = value,
            ParamField::Height => self.height = value,
            ParamField::MaxHeight => self.max_height = value,
            ParamField::Spacing => self.spacing = value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamField {
    Width,
    Height,
    MaxHeight,
    Spacing,
}

impl ParamField {
    fn label(self) -> &'static str {
        match self {
            ParamField::Width => "City Width",
            ParamField::Height => "City Height",
            ParamField::MaxHeight => "Max Building Height",
            ParamField::Spacing => "Max Base Size",
        }
    }

    fn range(self) -> (u32, u32) {
        match self {
            ParamField::Width | ParamField::Height => (5, 25),
            ParamField::MaxHeight => (1, 10),
            ParamField::Spacing => (0, 10),
        }
    }
}

/// Increments or decrements one form field.
#[derive(Component)]
pub struct SpinButton {
    field: ParamField,
    delta: i32,
}

/// Text node showing a field's current value.
#[derive(Component)]
pub struct FieldValue(ParamField);

#[derive(Clone, Copy)]
pub enum FormAction {
    Ground,
    Buildings,
    Clear,
}

/// One of the three generation buttons.
#[derive(Component)]
pub struct FormButton(FormAction);

pub fn setup_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("CITY GENERATOR"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));

            spawn_field_row(panel, ParamField::Width);
            spawn_field_row(panel, ParamField::Height);
            spawn_action_button(panel, "Generate Ground", FormAction::Ground);
            spawn_field_row(panel, ParamField::MaxHeight);
            spawn_field_row(panel, ParamField::Spacing);
            spawn_action_button(panel, "Generate Buildings", FormAction::Buildings);
            spawn_action_button(panel, "Clear Buildings", FormAction::Clear);
        });
}

fn spawn_field_row(panel: &mut ChildBuilder, field: ParamField) {
    panel
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Text::new(field.label()),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(LABEL_COLOR),
                Node {
                    width: Val::Px(130.0),
                    ..default()
                },
            ));
            spawn_spin_button(row, "-", field, -1);
            row.spawn((
                Text::new(ParameterForm::default().get(field).to_string()),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    width: Val::Px(24.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                FieldValue(field),
            ));
            spawn_spin_button(row, "+", field, 1);
        });
}

fn spawn_spin_button(row: &mut ChildBuilder, glyph: &str, field: ParamField, delta: i32) {
    row.spawn((
        Button,
        Node {
            width: Val::Px(20.0),
            height: Val::Px(20.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BUTTON_IDLE),
        SpinButton { field, delta },
    ))
    .with_children(|button| {
        button.spawn((
            Text::new(glyph),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(TEXT_COLOR),
        ));
    });
}

fn spawn_action_button(panel: &mut ChildBuilder, label: &str, action: FormAction) {
    panel
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            FormButton(action),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
        });
}

pub fn handle_spin_buttons(
    interactions: Query<(&Interaction, &SpinButton), (Changed<Interaction>, With<Button>)>,
    mut form: ResMut<ParameterForm>,
) {
    for (interaction, button) in &interactions {
        if *interaction == Interaction::Pressed {
            form.adjust(button.field, button.delta);
        }
    }
}

pub fn handle_form_buttons(
    interactions: Query<(&Interaction, &FormButton), (Changed<Interaction>, With<Button>)>,
    form: Res<ParameterForm>,
    mut ground_events: EventWriter<GenerateGround>,
    mut city_events: EventWriter<GenerateCity>,
    mut clear_events: EventWriter<ClearCity>,
) {
    for (interaction, button) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button.0 {
            FormAction::Ground => {
                ground_events.send(GenerateGround {
                    width: form.width,
                    height: form.height,
                });
            }
            FormAction::Buildings => {
                city_events.send(GenerateCity {
                    width: form.width,
                    height: form.height,
                    max_height: form.max_height,
                    spacing: form.spacing,
                });
            }
            FormAction::Clear => {
                clear_events.send(ClearCity);
            }
        }
    }
}

pub fn update_field_values(
    form: Res<ParameterForm>,
    mut values: Query<(&FieldValue, &mut Text)>,
) {
    if !form.is_changed() {
        return;
    }
    for (value, mut text) in &mut values {
        text.0 = form.get(value.0).to_string();
    }
}

pub fn update_button_styles(
    mut interactions: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, mut color) in &mut interactions {
        *color = match interaction {
            Interaction::Pressed => BUTTON_PRESSED.into(),
            Interaction::Hovered => BUTTON_HOVER.into(),
            Interaction::None => BUTTON_IDLE.into(),
        };
    }
}
