/// Defines a closed enumeration together with its domain and wire spellings.
macro_rules! define_wire_table {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => ($domain:literal, $wire:literal) ),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),* ];

            /// The identifier used inside the editor.
            pub fn domain(self) -> &'static str {
                match self {
                    $( $name::$variant => $domain ),*
                }
            }

            /// The identifier used in the flow document.
            pub fn wire(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),*
                }
            }

            pub fn from_wire(wire: &str) -> Option<Self> {
                match wire {
                    $( $wire => Some($name::$variant), )*
                    _ => None,
                }
            }

            fn from_canonical_domain(domain: &str) -> Option<Self> {
                match domain {
                    $( $domain => Some($name::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_wire_table! {
    /// Transaction attributes a condition can test.
    Field {
        Amount => ("amount", "AMOUNT"),
        Brand => ("card", "BRAND"),
        Installment => ("installments", "INSTALLMENT"),
        Metadata => ("metadata", "METADATA"),
        PaymentMethod => ("paymentMethod", "PAYMENT_METHOD"),
        Country => ("country", "COUNTRY"),
        Currency => ("currency", "CURRENCY"),
    }
}

define_wire_table! {
    /// Comparison operators a condition can apply.
    Operator {
        Equals => ("=", "EQUALS"),
        NotEquals => ("!=", "NOT_EQUALS"),
        GreaterThan => (">", "GREATER_THAN"),
        GreaterThanOrEqual => (">=", "GREATER_THAN_OR_EQUAL_TO"),
        LessThan => ("<", "LESS_THAN"),
        LessThanOrEqual => ("<=", "LESS_THAN_OR_EQUAL_TO"),
        In => ("in", "IN"),
        NotIn => ("not_in", "NOT_IN"),
        Contains => ("contains", "CONTAINS"),
        NotContains => ("not_contains", "NOT_CONTAINS"),
    }
}

impl Field {
    /// Accepts the canonical domain id and the `brand` alias.
    pub fn from_domain(domain: &str) -> Option<Self> {
        match domain {
            "brand" => Some(Field::Brand),
            other => Self::from_canonical_domain(other),
        }
    }
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::from_canonical_domain(symbol)
    }

    pub fn symbol(self) -> &'static str {
        self.domain()
    }
}

/// Domain field id → wire field. Unknown ids are upper-cased.
pub fn field_to_wire(domain: &str) -> String {
    match Field::from_domain(domain) {
        Some(field) => field.wire().to_string(),
        None => domain.to_uppercase(),
    }
}

/// Wire field → domain field id. Unknown wire fields fall back to `amount`.
pub fn field_from_wire(wire: &str) -> &'static str {
    Field::from_wire(wire).unwrap_or(Field::Amount).domain()
}

/// Operator symbol → wire operator. Unknown symbols become `EQUALS`.
pub fn operator_to_wire(symbol: &str) -> &'static str {
    Operator::from_symbol(symbol)
        .unwrap_or(Operator::Equals)
        .wire()
}

/// Wire operator → operator symbol. Unknown wire operators become `=`.
pub fn operator_from_wire(wire: &str) -> &'static str {
    Operator::from_wire(wire).unwrap_or(Operator::Equals).symbol()
}
