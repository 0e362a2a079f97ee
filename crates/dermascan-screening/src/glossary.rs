//! Dermatology terms annotated in rendered reports.

/// `(term, plain-language definition)`. Matching is case-insensitive and
/// whole-word; longer terms win over shorter overlapping ones.
pub const TERMS: &[(&str, &str)] = &[
    ("ABCDE", "Asymmetry, Border, Color, Diameter, Evolution: a checklist for spotting unusual moles."),
    ("actinic keratosis", "A rough, scaly patch caused by sun damage that can occasionally progress to skin cancer."),
    ("asymmetry", "One half of the spot does not match the other half."),
    ("basal cell carcinoma", "The most common skin cancer; slow-growing and rarely spreads."),
    ("benign", "Not cancerous."),
    ("blue-white veil", "A hazy blue-white area seen under dermoscopy, associated with melanoma."),
    ("border irregularity", "Edges that are ragged, notched or blurred."),
    ("dermatofibroma", "A common, harmless firm bump in the skin."),
    ("dermoscopic", "Seen through a dermatoscope, a lighted magnifier used to examine skin."),
    ("dermoscopy", "Examination of the skin with a lighted magnifier."),
    ("Glasgow 7-point checklist", "A weighted checklist of changes in size, shape and color used to triage moles."),
    ("HAM10000", "A public collection of ten thousand labeled dermoscopic images."),
    ("ISIC", "International Skin Imaging Collaboration, which publishes skin lesion image standards."),
    ("lesion", "Any area of skin that looks different from the surrounding skin."),
    ("melanocytic", "Made of pigment-producing skin cells."),
    ("melanoma", "A serious form of skin cancer that starts in pigment cells."),
    ("nevi", "Moles (plural of nevus)."),
    ("nevus", "A mole: a common, usually harmless growth of pigment cells."),
    ("pigment network", "A grid-like pattern of pigment seen under dermoscopy."),
    ("seborrheic keratosis", "A common, harmless waxy or wart-like growth."),
    ("squamous cell carcinoma", "A skin cancer arising from the outer skin layer, often on sun-exposed areas."),
    ("vascular lesion", "A mark formed by blood vessels, such as a cherry angioma."),
];

/// Definition for a term, ignoring case.
pub fn define(term: &str) -> Option<&'static str> {
    TERMS
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(term))
        .map(|(_, d)| *d)
}
