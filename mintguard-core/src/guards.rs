//! The guard catalog.
//!
//! Each guard kind is declared once in [`define_guards!`]: the declaration
//! produces the typed argument struct, its field descriptors, its decoder and
//! its catalog entry. Adding a guard kind means adding one block here.
//!
//! Declaration order is wire order: a kind's position is its bit in the
//! on-chain feature mask, so new kinds go at the end.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::coerce::Coerce;
use crate::error::GuardError;
use crate::registry::{GuardDefinition, GuardFieldSpec, RawFields, WireType};
use crate::types::{AsFieldValue, FieldValue, HexBytes, PublicKey, SolAmount, Timestamp, UnsignedInt};

macro_rules! field_required {
    () => {
        true
    };
    ($default:expr) => {
        false
    };
}

macro_rules! read_field {
    ($fields:ident, $name:literal, $ty:ty) => {
        $fields.required::<$ty>($name)?
    };
    ($fields:ident, $name:literal, $ty:ty, $default:expr) => {
        $fields.optional::<$ty>($name)?.unwrap_or($default)
    };
}

macro_rules! define_guards {
    ($(
        $(#[$meta:meta])*
        $variant:ident = $kind:literal {
            $( $field:ident: $ty:ty as $wire:ident => $name:literal $(= $default:expr)? ),+ $(,)?
        }
    )+) => {
        /// Identifier of a guard kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum GuardKind {
            $( $variant, )+
        }

        impl GuardKind {
            /// Every kind, in wire order.
            pub const ALL: &'static [GuardKind] = &[ $( GuardKind::$variant, )+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( GuardKind::$variant => $kind, )+
                }
            }

            pub fn parse(kind: &str) -> Option<GuardKind> {
                match kind {
                    $( $kind => Some(GuardKind::$variant), )+
                    _ => None,
                }
            }

            /// Bit position in the feature mask.
            pub fn index(&self) -> usize {
                *self as usize
            }

            pub fn fields(&self) -> &'static [GuardFieldSpec] {
                match self {
                    $( GuardKind::$variant => $variant::FIELDS, )+
                }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
            pub struct $variant {
                $(
                    #[serde(rename = $name)]
                    pub $field: $ty,
                )+
            }

            impl $variant {
                pub const KIND: GuardKind = GuardKind::$variant;

                pub const FIELDS: &'static [GuardFieldSpec] = &[
                    $(
                        GuardFieldSpec {
                            name: $name,
                            semantic_type: <$ty as Coerce>::SEMANTIC,
                            required: field_required!($($default)?),
                            wire: WireType::$wire,
                        },
                    )+
                ];

                fn decode(fields: &RawFields<'_>) -> Result<Guard, GuardError> {
                    Ok(Guard::$variant($variant {
                        $( $field: read_field!(fields, $name, $ty $(, $default)?), )+
                    }))
                }

                /// Typed field values in declaration order.
                pub fn field_values(&self) -> Vec<FieldValue<'_>> {
                    vec![ $( AsFieldValue::as_field_value(&self.$field), )+ ]
                }
            }

            impl From<$variant> for Guard {
                fn from(guard: $variant) -> Self {
                    Guard::$variant(guard)
                }
            }
        )+

        /// A configured guard: the typed argument of one guard instance.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(untagged)]
        pub enum Guard {
            $( $variant($variant), )+
        }

        impl Guard {
            pub fn kind(&self) -> GuardKind {
                match self {
                    $( Guard::$variant(_) => GuardKind::$variant, )+
                }
            }

            pub fn field_values(&self) -> Vec<FieldValue<'_>> {
                match self {
                    $( Guard::$variant(guard) => guard.field_values(), )+
                }
            }
        }

        pub(crate) static CATALOG: &[GuardDefinition] = &[
            $(
                GuardDefinition {
                    kind: GuardKind::$variant,
                    fields: $variant::FIELDS,
                    decode: $variant::decode,
                },
            )+
        ];
    };
}

define_guards! {
    /// Charges a penalty instead of failing when another guard rejects the mint.
    ///
    /// `lamports` keeps the raw smallest-unit count and its SOL rendering.
    BotTax = "botTax" {
        lamports: SolAmount as U64 => "lamports",
        last_instruction: bool as Bool => "lastInstruction" = true,
    }

    SolPayment = "solPayment" {
        lamports: UnsignedInt as U64 => "lamports",
        destination: PublicKey as PublicKey => "destination",
    }

    TokenPayment = "tokenPayment" {
        amount: UnsignedInt as U64 => "amount",
        mint: PublicKey as PublicKey => "mint",
        destination_ata: PublicKey as PublicKey => "destinationAta",
    }

    StartDate = "startDate" {
        date: Timestamp as I64 => "date",
    }

    ThirdPartySigner = "thirdPartySigner" {
        signer_key: PublicKey as PublicKey => "signerKey",
    }

    TokenGate = "tokenGate" {
        amount: UnsignedInt as U64 => "amount",
        mint: PublicKey as PublicKey => "mint",
    }

    Gatekeeper = "gatekeeper" {
        gatekeeper_network: PublicKey as PublicKey => "gatekeeperNetwork",
        expire_on_use: bool as Bool => "expireOnUse" = false,
    }

    EndDate = "endDate" {
        date: Timestamp as I64 => "date",
    }

    /// Minter must prove membership in a merkle tree with this root.
    AllowList = "allowList" {
        merkle_root: HexBytes as Bytes32 => "merkleRoot",
    }

    /// Per-wallet mint cap. The `id` lets several limits coexist across groups.
    MintLimit = "mintLimit" {
        id: UnsignedInt as U8 => "id",
        limit: UnsignedInt as U16 => "limit",
    }

    NftPayment = "nftPayment" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
        destination: PublicKey as PublicKey => "destination",
    }

    RedeemedAmount = "redeemedAmount" {
        maximum: UnsignedInt as U64 => "maximum",
    }

    /// Only the given address may mint.
    AddressGate = "addressGate" {
        address: PublicKey as PublicKey => "address",
    }

    NftGate = "nftGate" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
    }

    NftBurn = "nftBurn" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
    }

    TokenBurn = "tokenBurn" {
        amount: UnsignedInt as U64 => "amount",
        mint: PublicKey as PublicKey => "mint",
    }

    /// SOL payment held in a freeze escrow until thawed.
    FreezeSolPayment = "freezeSolPayment" {
        lamports: UnsignedInt as U64 => "lamports",
        destination: PublicKey as PublicKey => "destination",
    }

    FreezeTokenPayment = "freezeTokenPayment" {
        amount: UnsignedInt as U64 => "amount",
        mint: PublicKey as PublicKey => "mint",
        destination_ata: PublicKey as PublicKey => "destinationAta",
    }

    /// Extra programs allowed in the mint transaction.
    ProgramGate = "programGate" {
        additional: Vec<PublicKey> as PublicKeyVec => "additional",
    }

    /// Caps the total number of mints under one allocation id.
    Allocation = "allocation" {
        id: UnsignedInt as U8 => "id",
        limit: UnsignedInt as U32 => "limit",
    }

    Token2022Payment = "token2022Payment" {
        amount: UnsignedInt as U64 => "amount",
        mint: PublicKey as PublicKey => "mint",
        destination_ata: PublicKey as PublicKey => "destinationAta",
    }

    SolFixedFee = "solFixedFee" {
        lamports: UnsignedInt as U64 => "lamports",
        destination: PublicKey as PublicKey => "destination",
    }

    NftMintLimit = "nftMintLimit" {
        id: UnsignedInt as U8 => "id",
        limit: UnsignedInt as U16 => "limit",
        required_collection: PublicKey as PublicKey => "requiredCollection",
    }

    Edition = "edition" {
        edition_start_offset: UnsignedInt as U32 => "editionStartOffset",
    }

    AssetPayment = "assetPayment" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
        destination: PublicKey as PublicKey => "destination",
    }

    AssetBurn = "assetBurn" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
    }

    AssetMintLimit = "assetMintLimit" {
        id: UnsignedInt as U8 => "id",
        limit: UnsignedInt as U16 => "limit",
        required_collection: PublicKey as PublicKey => "requiredCollection",
    }

    AssetBurnMulti = "assetBurnMulti" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
        num: UnsignedInt as U8 => "num",
    }

    AssetPaymentMulti = "assetPaymentMulti" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
        destination: PublicKey as PublicKey => "destination",
        num: UnsignedInt as U8 => "num",
    }

    AssetGate = "assetGate" {
        required_collection: PublicKey as PublicKey => "requiredCollection",
    }

    /// Mint address must match a regular expression.
    VanityMint = "vanityMint" {
        regex: String as Str => "regex",
    }
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuardKind {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GuardKind::parse(s).ok_or_else(|| GuardError::UnknownGuardKind { kind: s.to_string() })
    }
}

impl Serialize for GuardKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
