// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The well-known feels, moods and looks.
//!
//! These are plain constants: there is nothing to initialize, and custom
//! feels or looks can be declared next to them with the same constructors.

/// Well-known [`Feel`](crate::Feel)s.
pub mod feels {
    use crate::feel::Feel;

    /// Baseline rendering.
    pub const DEFAULT: Feel = Feel::new("default");
    /// Emphasized, primary action.
    pub const PRIMARY: Feel = Feel::new("primary");
    /// Secondary action.
    pub const SECONDARY: Feel = Feel::new("secondary");
    /// Currently selected.
    pub const SELECTED: Feel = Feel::new("selected");
    /// Explicitly not selected.
    pub const UNSELECTED: Feel = Feel::new("unselected");
    /// Cannot be interacted with.
    pub const DISABLED: Feel = Feel::new("disabled");
    /// Not currently in use.
    pub const INACTIVE: Feel = Feel::new("inactive");
    /// Calls for caution.
    pub const WARNING: Feel = Feel::new("warning");
    /// Calls for immediate attention.
    pub const ALERT: Feel = Feel::new("alert");
    /// Background surroundings.
    pub const AMBIENT: Feel = Feel::new("ambient");
    /// Laid over other content.
    pub const OVERLAY: Feel = Feel::new("overlay");
    /// Lifted above its surroundings.
    pub const RAISED: Feel = Feel::new("raised");
    /// Partially hidden by something above it.
    pub const COVERED: Feel = Feel::new("covered");
    /// Floating above everything else.
    pub const FLOATING: Feel = Feel::new("floating");
    /// Fully see-through.
    pub const TRANSPARENT: Feel = Feel::new("transparent");
    /// Partially see-through.
    pub const TRANSLUCENT: Feel = Feel::new("translucent");
    /// Pressed into its surroundings.
    pub const EMBOSSED: Feel = Feel::new("embossed");
    /// Inside another container.
    pub const NESTED: Feel = Feel::new("nested");
    /// Under the pointer.
    pub const HOVERING: Feel = Feel::new("hovering");
    /// Shifted toward dark.
    pub const DARKER: Feel = Feel::new("darker");
    /// Shifted toward light.
    pub const LIGHTER: Feel = Feel::new("lighter");
    /// Maximal contrast.
    pub const CONTRASTED: Feel = Feel::new("contrasted");

    /// Every well-known feel.
    pub const ALL: [Feel; 22] = [
        DEFAULT,
        PRIMARY,
        SECONDARY,
        SELECTED,
        UNSELECTED,
        DISABLED,
        INACTIVE,
        WARNING,
        ALERT,
        AMBIENT,
        OVERLAY,
        RAISED,
        COVERED,
        FLOATING,
        TRANSPARENT,
        TRANSLUCENT,
        EMBOSSED,
        NESTED,
        HOVERING,
        DARKER,
        LIGHTER,
        CONTRASTED,
    ];
}

/// Well-known [`Mood`](crate::Mood)s; each shares its name with a feel.
pub mod moods {
    use crate::feel::Mood;

    /// Baseline rendering.
    pub const DEFAULT: Mood = Mood::new("default");
    /// Emphasized, primary action.
    pub const PRIMARY: Mood = Mood::new("primary");
    /// Secondary action.
    pub const SECONDARY: Mood = Mood::new("secondary");
    /// Currently selected.
    pub const SELECTED: Mood = Mood::new("selected");
    /// Explicitly not selected.
    pub const UNSELECTED: Mood = Mood::new("unselected");
    /// Cannot be interacted with.
    pub const DISABLED: Mood = Mood::new("disabled");
    /// Not currently in use.
    pub const INACTIVE: Mood = Mood::new("inactive");
    /// Calls for caution.
    pub const WARNING: Mood = Mood::new("warning");
    /// Calls for immediate attention.
    pub const ALERT: Mood = Mood::new("alert");
    /// Background surroundings.
    pub const AMBIENT: Mood = Mood::new("ambient");
    /// Laid over other content.
    pub const OVERLAY: Mood = Mood::new("overlay");
    /// Lifted above its surroundings.
    pub const RAISED: Mood = Mood::new("raised");
    /// Partially hidden by something above it.
    pub const COVERED: Mood = Mood::new("covered");
    /// Floating above everything else.
    pub const FLOATING: Mood = Mood::new("floating");
    /// Inside another container.
    pub const NESTED: Mood = Mood::new("nested");
    /// Under the pointer.
    pub const HOVERING: Mood = Mood::new("hovering");
    /// Shifted toward dark.
    pub const DARKER: Mood = Mood::new("darker");
    /// Shifted toward light.
    pub const LIGHTER: Mood = Mood::new("lighter");
    /// Maximal contrast.
    pub const CONTRASTED: Mood = Mood::new("contrasted");
}

/// Well-known [`Look`](crate::Look)s.
pub mod looks {
    use crate::look::{ColorLook, FontLook, Look, LengthLook, NumberLook, ShadowLook, TimingLook};

    /// Body font.
    pub const FONT: FontLook = Look::new("font");
    /// Body text.
    pub const TEXT_COLOR: ColorLook = Look::new("textColor");
    /// Icon fill.
    pub const ICON_COLOR: ColorLook = Look::new("iconColor");
    /// Control labels.
    pub const LABEL_COLOR: ColorLook = Look::new("labelColor");
    /// Chart legends and captions.
    pub const LEGEND_COLOR: ColorLook = Look::new("legendColor");
    /// Placeholder text in empty inputs.
    pub const PLACEHOLDER_COLOR: ColorLook = Look::new("placeholderColor");
    /// Highlighted text background.
    pub const HIGHLIGHT_COLOR: ColorLook = Look::new("highlightColor");
    /// Surface fill.
    pub const BACKGROUND_COLOR: ColorLook = Look::new("backgroundColor");
    /// Outlines.
    pub const BORDER_COLOR: ColorLook = Look::new("borderColor");
    /// Separators and etched lines.
    pub const ETCH_COLOR: ColorLook = Look::new("etchColor");
    /// Scrims and masks.
    pub const MASK_COLOR: ColorLook = Look::new("maskColor");
    /// Axis ticks.
    pub const TICK_COLOR: ColorLook = Look::new("tickColor");
    /// Grid lines.
    pub const GRID_COLOR: ColorLook = Look::new("gridColor");
    /// Accent fill.
    pub const ACCENT_COLOR: ColorLook = Look::new("accentColor");
    /// Focus rings.
    pub const FOCUS_COLOR: ColorLook = Look::new("focusColor");
    /// Hover feedback.
    pub const HOVER_COLOR: ColorLook = Look::new("hoverColor");
    /// Overall opacity.
    pub const OPACITY: NumberLook = Look::new("opacity");
    /// Gaps between elements.
    pub const SPACING: LengthLook = Look::new("spacing");
    /// Corner rounding.
    pub const CORNER_RADIUS: LengthLook = Look::new("cornerRadius");
    /// Drop shadow.
    pub const SHADOW: ShadowLook = Look::new("shadow");
    /// Transition timing.
    pub const TIMING: TimingLook = Look::new("timing");
}
