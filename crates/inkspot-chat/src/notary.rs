//! Built-in content for The Ink Spot's chat widget.

use crate::catalog::Topic;

pub(crate) const REPLIES: &[(Topic, &str)] = &[
    (
        Topic::Pricing,
        "Our pricing is straightforward:\n\n\
         • Standard Notarization — $25/document\n\
         • Mobile Notary — $75 (we come to you)\n\
         • Business Package — $199/month\n\n\
         View full details at our <a href=\"pricing.html\">pricing page</a>.",
    ),
    (
        Topic::Hours,
        "We're available Monday through Friday, 9 AM to 6 PM, and Saturday 10 AM to 2 PM. \
         Same-day appointments are often available for mobile services.",
    ),
    (
        Topic::Location,
        "We serve the greater Charlotte, NC area within a 25-mile radius of downtown, \
         including Huntersville, Matthews, Concord, and surrounding communities.",
    ),
    (
        Topic::Documents,
        "You'll need to bring:\n\n\
         • A valid government-issued photo ID (driver's license, passport, or state ID)\n\
         • Your unsigned documents\n\n\
         Most notarizations take 5–15 minutes.",
    ),
    (
        Topic::Mobile,
        "Our mobile notary service means we come to your home, office, or any convenient \
         location in the Charlotte area. The fee is $75 per visit with same-day availability.",
    ),
    (
        Topic::Book,
        "You can book an appointment right now on our <a href=\"scheduling.html\">scheduling page</a>. \
         We offer instant confirmation and free rescheduling.",
    ),
    (
        Topic::Services,
        "We offer:\n\n\
         • General Notary Services (affidavits, POA, wills, I-9s)\n\
         • Certified Loan Signing Agent services\n\
         • Notary Trust Delivery Agent\n\
         • Field Inspections\n\n\
         Learn more on our <a href=\"index.html\">homepage</a>.",
    ),
    (
        Topic::Contact,
        "You can reach us through the <a href=\"index.html#contact\">contact form</a> on our \
         website, or use this chat. We respond within 24 hours.",
    ),
    (
        Topic::Loan,
        "As NNA certified signing agents, we handle all real estate closings including \
         purchases, refinances, HELOCs, and reverse mortgages. Accuracy and professionalism \
         guaranteed.",
    ),
];

pub(crate) const KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Pricing,
        &[
            "price", "pricing", "cost", "how much", "fee", "fees", "rate", "rates", "charge",
            "pay", "payment", "afford", "expensive", "cheap",
        ],
    ),
    (
        Topic::Hours,
        &[
            "hours", "open", "close", "schedule", "availability", "available", "when", "time",
            "today",
        ],
    ),
    (
        Topic::Location,
        &[
            "location", "where", "address", "area", "charlotte", "distance", "far", "serve",
            "travel", "radius",
        ],
    ),
    (
        Topic::Documents,
        &[
            "document", "documents", "bring", "need", "id", "identification", "require",
            "what do i",
        ],
    ),
    (
        Topic::Mobile,
        &[
            "mobile", "come to me", "travel", "house", "home", "office", "on-site", "onsite",
        ],
    ),
    (
        Topic::Book,
        &[
            "book", "booking", "appointment", "schedule", "reserve", "sign up", "slot",
        ],
    ),
    (
        Topic::Services,
        &[
            "service", "services", "offer", "do you", "what can", "notarize", "notarization",
            "help with",
        ],
    ),
    (
        Topic::Contact,
        &[
            "contact", "reach", "email", "phone", "call", "talk", "speak", "person", "human",
        ],
    ),
    (
        Topic::Loan,
        &[
            "loan", "signing", "mortgage", "real estate", "closing", "refinance", "heloc",
        ],
    ),
];

pub(crate) const FALLBACK: &str = "Thanks for your question! For specific inquiries, feel free \
    to use our <a href=\"index.html#contact\">contact form</a> or call us directly. We typically \
    respond within 24 hours.\n\nIn the meantime, I can help with pricing, services, booking, \
    hours, locations, or document requirements.";

pub(crate) const QUICK_REPLIES: &[(&str, &str)] = &[
    ("Pricing", "What are your prices?"),
    ("Book Now", "How do I book an appointment?"),
    ("Services", "What services do you offer?"),
    ("Hours", "What are your hours?"),
];
