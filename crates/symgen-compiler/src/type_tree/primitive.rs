//! Native scalar spellings and their Rust counterparts.

/// Rust scalar for a native primitive, ignoring cv-qualifiers and spacing.
///
/// Integer widths follow the LLP64 model of the symbol backends we read
/// (`long` is 32 bits).
pub fn rust_scalar(native: &str) -> Option<&'static str> {
    let normalized = normalize(native);
    let scalar = match normalized.as_str() {
        "void" => "Void",
        "bool" | "_Bool" => "bool",
        "char" | "signed char" | "int8_t" | "__int8" => "i8",
        "unsigned char" | "uint8_t" | "unsigned __int8" | "byte" | "BYTE" => "u8",
        "short" | "short int" | "signed short" | "int16_t" | "__int16" => "i16",
        "unsigned short" | "unsigned short int" | "uint16_t" | "unsigned __int16" | "wchar_t"
        | "char16_t" => "u16",
        "int" | "signed int" | "signed" | "long" | "long int" | "signed long" | "int32_t"
        | "__int32" | "HRESULT" => "i32",
        "unsigned int" | "unsigned" | "unsigned long" | "unsigned long int" | "uint32_t"
        | "unsigned __int32" | "char32_t" => "u32",
        "long long" | "long long int" | "signed long long" | "int64_t" | "__int64" => "i64",
        "unsigned long long" | "unsigned long long int" | "uint64_t" | "unsigned __int64" => {
            "u64"
        }
        "float" => "f32",
        "double" | "long double" => "f64",
        _ => return None,
    };
    Some(scalar)
}

/// Native integer spelling for an enum without a reported underlying type.
pub fn integer_of_size(size: u64) -> &'static str {
    match size {
        1 => "char",
        2 => "short",
        8 => "long long",
        _ => "int",
    }
}

fn normalize(native: &str) -> String {
    native
        .split_whitespace()
        .filter(|word| !matches!(*word, "const" | "volatile"))
        .collect::<Vec<_>>()
        .join(" ")
}
