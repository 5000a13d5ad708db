//! Welding joints reference guide.
//!
//! Static, read-only notes on common joint types: edge preparation, root gap,
//! torch angle and rod position. Nothing here is computed.

use serde::Serialize;

/// One entry in the joints guide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JointReference {
    /// Display name ("Butt Joint")
    pub name: &'static str,
    /// Short lookup aliases, lowercase
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub preparation: &'static str,
    pub gap: &'static str,
    pub angle: &'static str,
    pub rod_position: &'static str,
}

static JOINTS: [JointReference; 5] = [
    JointReference {
        name: "Butt Joint",
        aliases: &["butt"],
        description: "A joint between two members aligned approximately in the same plane.",
        preparation: "Ensure edges are clean and properly beveled if required (for thicker materials).",
        gap: "Typically 1-3mm to ensure full penetration. Adjust based on thickness and process.",
        angle: "For beveled joints, a 60-75 degree included angle is common.",
        rod_position: "Hold the electrode/torch at a 90-degree angle to the plate surface.",
    },
    JointReference {
        name: "Fillet Joint",
        aliases: &["fillet"],
        description: "A joint where two pieces of metal are connected at a right angle, with welding on the inside corner.",
        preparation: "Clean surfaces are crucial. No special edge preparation is usually needed.",
        gap: "Ensure no gap between the pieces for a strong joint.",
        angle: "Hold the electrode/torch at a 45-degree angle between the two pieces.",
        rod_position: "Aim the arc directly into the corner of the joint.",
    },
    JointReference {
        name: "Lap Joint",
        aliases: &["lap"],
        description: "A joint between two overlapping members.",
        preparation: "Surfaces must be clean. Ensure the plates are in close contact.",
        gap: "No gap should exist between the overlapping plates.",
        angle: "Angle the electrode/torch at about 60-70 degrees to the horizontal plate.",
        rod_position: "Focus the arc on the edge of the top plate to ensure good fusion without excessive melt-through.",
    },
    JointReference {
        name: "Corner Joint",
        aliases: &["corner"],
        description: "A joint between two members located at an angle to one another at a corner.",
        preparation: "Clean the edges thoroughly. Beveling may be needed for thick sections.",
        gap: "Can be open or closed. An open corner requires filler metal to bridge the gap.",
        angle: "Hold the electrode/torch at a 45-degree angle to fuse both pieces equally.",
        rod_position: "Direct the arc into the corner. For open corners, use a weaving motion.",
    },
    JointReference {
        name: "T-Joint (Tee Joint)",
        aliases: &["tee", "t", "t-joint", "tee joint"],
        description: "A joint between two members located at right angles to each other in the form of a 'T'.",
        preparation: "Ensure the surfaces are clean. The vertical member's edge should be straight.",
        gap: "A slight gap might be acceptable, but tight fit-up is preferred.",
        angle: "Hold the electrode/torch at a 45-degree angle to the joint.",
        rod_position: "Direct the arc into the root of the joint. Use a slight circular motion to ensure fusion on both sides.",
    },
];

/// Every joint in the guide, in display order
pub fn all_joints() -> &'static [JointReference] {
    &JOINTS
}

/// Look up a joint by display name or alias (case-insensitive).
pub fn find_joint(name: &str) -> Option<&'static JointReference> {
    let lowered = name.trim().to_lowercase();
    let short = lowered.strip_suffix(" joint").unwrap_or(&lowered);
    JOINTS
        .iter()
        .find(|joint| joint.name.to_lowercase() == lowered || joint.aliases.contains(&short))
}

impl JointReference {
    /// Labelled detail lines as shown on a guide card
    pub fn details(&self) -> [(&'static str, &'static str); 4] {
        [
            ("Preparation", self.preparation),
            ("Gap", self.gap),
            ("Angle", self.angle),
            ("Rod Position", self.rod_position),
        ]
    }
}
