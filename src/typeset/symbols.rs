//! Command and script tables for the TeX subset understood by [`super::TexTypesetter`]

/// How a symbol command is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// Letters and constants, set tight
    Ordinary,
    /// Prefix operators such as `\neg` or `\Box`, set tight
    Prefix,
    /// Binary operators and relations, padded with a space on each side
    Binary,
}

/// Look up a symbol command by name (without the backslash).
pub fn lookup(name: &str) -> Option<(&'static str, SymbolClass)> {
    use SymbolClass::*;

    let entry = match name {
        // Modal operators
        "Box" | "square" => ("□", Prefix),
        "Diamond" | "diamond" | "lozenge" => ("◇", Prefix),

        // Connectives
        "neg" | "lnot" => ("¬", Prefix),
        "land" | "wedge" => ("∧", Binary),
        "lor" | "vee" => ("∨", Binary),
        "to" | "rightarrow" | "implies" => ("→", Binary),
        "Rightarrow" => ("⇒", Binary),
        "leftarrow" | "gets" => ("←", Binary),
        "Leftarrow" => ("⇐", Binary),
        "leftrightarrow" | "iff" => ("↔", Binary),
        "Leftrightarrow" => ("⇔", Binary),
        "oplus" => ("⊕", Binary),

        // Quantifiers and constants
        "forall" => ("∀", Prefix),
        "exists" => ("∃", Prefix),
        "top" => ("⊤", Ordinary),
        "bot" | "perp" => ("⊥", Ordinary),
        "emptyset" | "varnothing" => ("∅", Ordinary),
        "infty" => ("∞", Ordinary),

        // Relations
        "vdash" => ("⊢", Binary),
        "dashv" => ("⊣", Binary),
        "models" | "vDash" => ("⊨", Binary),
        "Vdash" => ("⊩", Binary),
        "equiv" => ("≡", Binary),
        "neq" | "ne" => ("≠", Binary),
        "leq" | "le" => ("≤", Binary),
        "geq" | "ge" => ("≥", Binary),
        "in" => ("∈", Binary),
        "notin" => ("∉", Binary),
        "subset" => ("⊂", Binary),
        "subseteq" => ("⊆", Binary),
        "cup" => ("∪", Binary),
        "cap" => ("∩", Binary),
        "setminus" => ("∖", Binary),
        "times" => ("×", Binary),
        "cdot" => ("·", Binary),
        "circ" => ("∘", Binary),
        "mapsto" => ("↦", Binary),

        // Punctuation
        "ldots" | "dots" => ("…", Ordinary),
        "cdots" => ("⋯", Ordinary),
        "prime" => ("′", Ordinary),
        "langle" => ("⟨", Ordinary),
        "rangle" => ("⟩", Ordinary),
        "lbrace" => ("{", Ordinary),
        "rbrace" => ("}", Ordinary),
        "vert" | "mid" => ("|", Ordinary),
        "Vert" => ("‖", Ordinary),

        // Greek
        "alpha" => ("α", Ordinary),
        "beta" => ("β", Ordinary),
        "gamma" => ("γ", Ordinary),
        "delta" => ("δ", Ordinary),
        "epsilon" | "varepsilon" => ("ε", Ordinary),
        "zeta" => ("ζ", Ordinary),
        "eta" => ("η", Ordinary),
        "theta" => ("θ", Ordinary),
        "iota" => ("ι", Ordinary),
        "kappa" => ("κ", Ordinary),
        "lambda" => ("λ", Ordinary),
        "mu" => ("μ", Ordinary),
        "nu" => ("ν", Ordinary),
        "xi" => ("ξ", Ordinary),
        "pi" => ("π", Ordinary),
        "rho" => ("ρ", Ordinary),
        "sigma" => ("σ", Ordinary),
        "tau" => ("τ", Ordinary),
        "phi" | "varphi" => ("φ", Ordinary),
        "chi" => ("χ", Ordinary),
        "psi" => ("ψ", Ordinary),
        "omega" => ("ω", Ordinary),
        "Gamma" => ("Γ", Ordinary),
        "Delta" => ("Δ", Ordinary),
        "Theta" => ("Θ", Ordinary),
        "Lambda" => ("Λ", Ordinary),
        "Pi" => ("Π", Ordinary),
        "Sigma" => ("Σ", Ordinary),
        "Phi" => ("Φ", Ordinary),
        "Psi" => ("Ψ", Ordinary),
        "Omega" => ("Ω", Ordinary),

        _ => return None,
    };

    Some(entry)
}

/// Horizontal space commands and the text they expand to.
pub fn spacing(name: &str) -> Option<&'static str> {
    match name {
        "," | ":" | ";" | " " => Some(" "),
        "quad" => Some("  "),
        "qquad" => Some("    "),
        "!" => Some(""),
        _ => None,
    }
}

/// Unicode subscript form of `c`, if one exists.
pub fn subscript(c: char) -> Option<char> {
    let mapped = match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        _ => return None,
    };
    Some(mapped)
}

/// Unicode superscript form of `c`, if one exists.
pub fn superscript(c: char) -> Option<char> {
    let mapped = match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'i' => 'ⁱ',
        'n' => 'ⁿ',
        '*' => '*',
        '\'' => '′',
        _ => return None,
    };
    Some(mapped)
}
