//! Parameter form UI.

use bevy::prelude::*;

pub mod panel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<panel::ParameterForm>()
            .add_systems(Startup, panel::setup_panel)
            .add_systems(
                Update,
                (
                    panel::handle_spin_buttons,
                    panel::handle_form_buttons,
                    panel::update_field_values,
                    panel::update_button_styles,
                ),
            );
    }
}
